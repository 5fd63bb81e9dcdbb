//! Static descriptors of the routing service and its schedule.

use chrono::NaiveDate;
use serde::Deserialize;

/// Query filters the router understands.
///
/// Missing flags are treated as unsupported, as is the whole descriptor when
/// the service does not answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterInfo {
    pub supports_max_num_transfers: bool,
    pub supports_max_travel_time: bool,
    pub supports_max_walking_duration: bool,
    pub supports_min_transfer_duration: bool,
    pub supports_accessibility: bool,
    pub supports_bikes: bool,
    pub supports_travel_modes: bool,
}

/// Older name of the router capability descriptor
pub type QueryFeatures = RouterInfo;

/// What the loaded schedule contains
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInfo {
    #[serde(default)]
    pub has_accessibility: bool,
    #[serde(default)]
    pub has_bikes: bool,
    #[serde(default)]
    pub has_travel_modes: bool,
    #[serde(default)]
    pub schedule_validity: Option<ScheduleValidity>,
}

/// Inclusive date range the schedule covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleValidity {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScheduleValidity {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Nearest date inside the range
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        if date < self.start_date {
            self.start_date
        } else if date > self.end_date {
            self.end_date
        } else {
            date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_router_info_missing_flags() {
        let raw = r#"{ "supportsAccessibility": true, "supportsBikes": false }"#;
        let info: RouterInfo = serde_json::from_str(raw).unwrap();

        assert!(info.supports_accessibility);
        assert!(!info.supports_bikes);
        assert!(!info.supports_travel_modes);
        assert_eq!(RouterInfo::default(), serde_json::from_str::<RouterInfo>("{}").unwrap());
    }

    #[test]
    fn test_schedule_validity() {
        let info: ScheduleInfo = serde_json::from_str(
            r#"{
                "hasAccessibility": true,
                "hasBikes": false,
                "hasTravelModes": true,
                "scheduleValidity": { "startDate": "2024-01-01", "endDate": "2024-12-14" }
            }"#,
        )
        .unwrap();

        let validity = info.schedule_validity.unwrap();
        assert!(validity.contains(date(2024, 1, 1)));
        assert!(validity.contains(date(2024, 12, 14)));
        assert!(!validity.contains(date(2024, 12, 15)));

        assert_eq!(validity.clamp(date(2023, 6, 1)), date(2024, 1, 1));
        assert_eq!(validity.clamp(date(2025, 6, 1)), date(2024, 12, 14));
        assert_eq!(validity.clamp(date(2024, 6, 1)), date(2024, 6, 1));
    }
}
