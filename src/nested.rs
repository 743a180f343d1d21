//! Safe dotted-path updates against an in-memory options object.
//!
//! Path strings can come from imported or user-controlled data, so segments
//! that could pollute object prototypes on a JavaScript consumer are
//! rejected before anything is touched.

use log::warn;
use serde_json::{Map, Value as JsonValue};

use crate::error::PathError;

/// Segments rejected by [`apply_path_default`]. Extendable at call sites by
/// passing a custom denylist to [`apply_path`].
pub const DEFAULT_DENYLIST: &[&str] = &["__proto__", "constructor", "prototype"];

/// [`apply_path`] with the stock denylist.
pub fn apply_path_default(
    root: &mut JsonValue,
    path: &str,
    value: JsonValue,
) -> Result<(), PathError> {
    apply_path(root, path, value, DEFAULT_DENYLIST)
}

/// Splits `path` on `.` and assigns `value` at the final segment, creating
/// intermediate objects along the way. Non-object intermediates are replaced
/// with fresh objects.
///
/// Validation happens before any mutation: if any segment is empty or on the
/// denylist, the whole update is rejected and `root` is left unchanged.
pub fn apply_path(
    root: &mut JsonValue,
    path: &str,
    value: JsonValue,
    denylist: &[&str],
) -> Result<(), PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(PathError::EmptyPath);
        }
        if denylist.contains(segment) {
            warn!("blocked unsafe path segment \"{segment}\" in \"{path}\"");
            return Err(PathError::BlockedSegment(segment.to_string()));
        }
    }

    let (last, intermediate) = match segments.split_last() {
        Some(parts) => parts,
        None => return Err(PathError::EmptyPath),
    };

    let mut current = root;
    for segment in intermediate {
        if !current.is_object() {
            *current = JsonValue::Object(Map::new());
        }
        let JsonValue::Object(map) = current else {
            return Err(PathError::EmptyPath);
        };
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
    }

    if !current.is_object() {
        *current = JsonValue::Object(Map::new());
    }
    let JsonValue::Object(map) = current else {
        return Err(PathError::EmptyPath);
    };
    map.insert(last.to_string(), value);
    Ok(())
}
