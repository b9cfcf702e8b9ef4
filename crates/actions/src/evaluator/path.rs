//! Dot-path field resolution into the metrics payload.

use serde_json::Value;

/// Navigate `payload` along a dot-separated path.
///
/// A missing key, a non-object parent, an empty path or a JSON `null`
/// all resolve to `None`.
pub fn resolve_field<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = payload;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}
