//! Stop name suggestions for free-text input.

use naviqore_transit::Stop;

/// Merges prefix matches with substring matches into at most `limit`
/// suggestions, one per stop name.
///
/// A repeated name keeps its first position but takes the id of the latest
/// stop seen with it.
/// Prefix matches come first. `contains` is only asked for results when the
/// prefix matches leave room.
pub fn merge_suggestions(
    starts_with: Vec<Stop>,
    contains: impl FnOnce() -> Vec<Stop>,
    limit: usize,
) -> Vec<Stop> {
    let mut suggestions: Vec<Stop> = Vec::with_capacity(limit);

    let push = |suggestions: &mut Vec<Stop>, stop: Stop| {
        match suggestions.iter().position(|s| s.name == stop.name) {
            Some(index) => suggestions[index] = stop,
            None if suggestions.len() < limit => suggestions.push(stop),
            None => {}
        }
    };

    for stop in starts_with {
        push(&mut suggestions, stop);
    }

    if suggestions.len() < limit {
        for stop in contains() {
            push(&mut suggestions, stop);
            if suggestions.len() >= limit {
                break;
            }
        }
    }

    suggestions
}
