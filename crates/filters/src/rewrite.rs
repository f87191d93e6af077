//! Rewriting of relative resource locators into absolute URLs.
//!
//! Radarr reports cached artwork as origin-relative paths
//! (`/MediaCover/12/poster.jpg`). Those are useless to a client that does
//! not know where Radarr lives, so the paths listed here get the
//! instance origin prefixed. No other module builds absolute URLs.

use serde_json::Value;

use crate::path::{KeyPath, Segment};

/// Absolutize every string reachable through `paths`, in place.
///
/// Intermediate `*` segments fan out over mapping values or sequence
/// elements; a missing literal segment abandons that path silently. A
/// final `*` rewrites every string at that level. Non-string and empty
/// values are never touched.
///
/// Values that are already absolute are prefixed again; callers only
/// point this at fields Radarr emits as relative paths.
pub fn rewrite_locators<'a>(value: &'a mut Value, paths: &[KeyPath], origin: &str) -> &'a mut Value {
    for path in paths {
        rewrite_path(value, path.segments(), origin);
    }
    value
}

fn rewrite_path(value: &mut Value, segments: &[Segment], origin: &str) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        match head {
            Segment::Wildcard => match value {
                Value::Object(map) => map.values_mut().for_each(|v| absolutize(v, origin)),
                Value::Array(items) => items.iter_mut().for_each(|v| absolutize(v, origin)),
                _ => {}
            },
            Segment::Key(key) => {
                if let Some(leaf) = value.as_object_mut().and_then(|m| m.get_mut(key)) {
                    absolutize(leaf, origin);
                }
            }
        }
        return;
    }

    match head {
        Segment::Wildcard => match value {
            Value::Object(map) => map
                .values_mut()
                .for_each(|child| rewrite_path(child, rest, origin)),
            Value::Array(items) => items
                .iter_mut()
                .for_each(|child| rewrite_path(child, rest, origin)),
            _ => {}
        },
        Segment::Key(key) => {
            if let Some(child) = value.as_object_mut().and_then(|m| m.get_mut(key)) {
                rewrite_path(child, rest, origin);
            }
        }
    }
}

fn absolutize(value: &mut Value, origin: &str) {
    if let Value::String(locator) = value {
        if let Some(absolute) = absolute_locator(origin, locator) {
            *locator = absolute;
        }
    }
}

/// `origin + locator`, inserting a `/` when the locator lacks one.
/// Empty locators have no absolute form.
pub fn absolute_locator(origin: &str, locator: &str) -> Option<String> {
    if locator.is_empty() {
        None
    } else if locator.starts_with('/') {
        Some(format!("{origin}{locator}"))
    } else {
        Some(format!("{origin}/{locator}"))
    }
}
