//! In-process stand-in for the routing service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

#[derive(Default)]
struct Routes {
    responses: HashMap<String, (StatusCode, String)>,
    requests: Mutex<Vec<String>>,
}

/// Serves canned JSON bodies by path and records every request it sees
pub struct MockService {
    #[allow(dead_code)] // Kept alive to keep server running
    runtime: Runtime,
    port: u16,
    routes: Arc<Routes>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockService {
    pub fn start(responses: &[(&str, StatusCode, &str)]) -> Self {
        let runtime = Runtime::new().expect("tokio runtime");

        let routes = Arc::new(Routes {
            responses: responses
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (port_tx, port_rx) = oneshot::channel();

        let app = Router::new().fallback(respond).with_state(routes.clone());

        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let _ = port_tx.send(addr.port());

            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        let port = runtime.block_on(async { port_rx.await.unwrap() });

        Self {
            runtime,
            port,
            routes,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Path and query of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.routes.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> String {
        self.requests().pop().expect("no request received")
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn respond(State(routes): State<Arc<Routes>>, uri: Uri) -> Response {
    routes.requests.lock().unwrap().push(uri.to_string());

    match routes.responses.get(uri.path()) {
        Some((status, body)) => (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
