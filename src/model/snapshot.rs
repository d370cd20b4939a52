//! Typed view of the window server's managed-display-space listing.
//!
//! The raw listing arrives as loosely-typed nested records. Everything is
//! validated once here, at the model boundary: a display record missing a
//! required field is dropped with a warning so the remaining displays can
//! still be numbered.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Identifier the window server reports for the built-in main display.
pub const MAIN_DISPLAY_IDENTIFIER: &str = "Main";

/// One space as reported by the window server, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpace {
    pub uuid: Option<String>,
    pub managed_id: Option<i64>,
    /// True when the raw record carries fullscreen-layout metadata.
    #[serde(default)]
    pub is_fullscreen: bool,
}

/// One display record as reported by the window server, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDisplay {
    pub identifier: Option<String>,
    pub current_space: Option<RawSpace>,
    pub spaces: Option<Vec<RawSpace>>,
}

/// The full per-display listing plus the focused-display query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub displays: Vec<RawDisplay>,
    pub focused_display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedDisplayRecord {
    #[error("display record has no identifier")]
    MissingIdentifier,
    #[error("display {0} has no parseable current space")]
    MissingCurrentSpace(String),
    #[error("display {0} has no spaces list")]
    MissingSpaces(String),
    #[error("display {0} lists a space without uuid or managed id")]
    MalformedSpace(String),
}

/// An addressable (non-fullscreen) virtual desktop.
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub managed_id: i64,
    pub uuid: String,
}

/// A validated display: its addressable spaces in window-server order and the
/// marker for the space presently visible on it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySpaces {
    pub identifier: String,
    pub current_uuid: String,
    pub current_managed_id: i64,
    pub spaces: Vec<Space>,
}

/// The model the numbering resolver consumes. Rebuilt from scratch on every
/// snapshot; nothing is mutated across invocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceModel {
    pub displays: Vec<DisplaySpaces>,
    /// Managed id of the logically active space, still unresolved against the
    /// global numbering. `None` when no display matched main or focused.
    pub active_space_id: Option<i64>,
}

pub fn build_model(raw: &RawSnapshot) -> SpaceModel {
    let mut model = SpaceModel::default();
    for record in &raw.displays {
        match build_display(record) {
            Ok(display) => {
                // Last match wins: the focused display overrides "Main" when
                // it appears later in enumeration order.
                if display.identifier == MAIN_DISPLAY_IDENTIFIER
                    || Some(display.identifier.as_str()) == raw.focused_display.as_deref()
                {
                    model.active_space_id = Some(display.current_managed_id);
                }
                model.displays.push(display);
            }
            Err(err) => warn!(%err, "skipping malformed display record"),
        }
    }
    model
}

fn build_display(record: &RawDisplay) -> Result<DisplaySpaces, MalformedDisplayRecord> {
    let identifier = record
        .identifier
        .clone()
        .ok_or(MalformedDisplayRecord::MissingIdentifier)?;
    let current = record
        .current_space
        .as_ref()
        .and_then(|space| Some((space.uuid.clone()?, space.managed_id?)))
        .ok_or_else(|| MalformedDisplayRecord::MissingCurrentSpace(identifier.clone()))?;
    let raw_spaces = record
        .spaces
        .as_ref()
        .ok_or_else(|| MalformedDisplayRecord::MissingSpaces(identifier.clone()))?;

    let mut spaces = Vec::with_capacity(raw_spaces.len());
    for raw in raw_spaces {
        if raw.is_fullscreen {
            continue;
        }
        let space = raw
            .uuid
            .clone()
            .zip(raw.managed_id)
            .map(|(uuid, managed_id)| Space { managed_id, uuid })
            .ok_or_else(|| MalformedDisplayRecord::MalformedSpace(identifier.clone()))?;
        spaces.push(space);
    }

    Ok(DisplaySpaces {
        identifier,
        current_uuid: current.0,
        current_managed_id: current.1,
        spaces,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn snapshot(value: serde_json::Value) -> RawSnapshot {
        serde_json::from_value(value).expect("deserialize RawSnapshot")
    }

    #[test]
    fn drops_fullscreen_spaces_and_keeps_order() {
        let raw = snapshot(json!({
            "displays": [{
                "identifier": "Main",
                "current_space": { "uuid": "b", "managed_id": 2 },
                "spaces": [
                    { "uuid": "a", "managed_id": 1 },
                    { "uuid": "fs", "managed_id": 9, "is_fullscreen": true },
                    { "uuid": "b", "managed_id": 2 },
                ],
            }],
            "focused_display": "Main",
        }));

        let model = build_model(&raw);
        assert_eq!(model.displays.len(), 1);
        let uuids: Vec<&str> =
            model.displays[0].spaces.iter().map(|s| s.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "b"]);
        assert_eq!(model.active_space_id, Some(2));
    }

    #[test]
    fn malformed_display_is_skipped_without_aborting() {
        let raw = snapshot(json!({
            "displays": [
                { "identifier": "broken" },
                {
                    "identifier": "ok",
                    "current_space": { "uuid": "x", "managed_id": 7 },
                    "spaces": [{ "uuid": "x", "managed_id": 7 }],
                },
            ],
            "focused_display": "ok",
        }));

        let model = build_model(&raw);
        assert_eq!(model.displays.len(), 1);
        assert_eq!(model.displays[0].identifier, "ok");
        assert_eq!(model.active_space_id, Some(7));
    }

    #[test]
    fn space_without_managed_id_poisons_only_its_display() {
        let raw = snapshot(json!({
            "displays": [
                {
                    "identifier": "bad",
                    "current_space": { "uuid": "u", "managed_id": 1 },
                    "spaces": [{ "uuid": "u" }],
                },
                {
                    "identifier": "good",
                    "current_space": { "uuid": "v", "managed_id": 2 },
                    "spaces": [{ "uuid": "v", "managed_id": 2 }],
                },
            ],
        }));

        let model = build_model(&raw);
        assert_eq!(model.displays.len(), 1);
        assert_eq!(model.displays[0].identifier, "good");
    }

    #[test]
    fn focused_display_overrides_main_for_active_space() {
        let raw = snapshot(json!({
            "displays": [
                {
                    "identifier": "Main",
                    "current_space": { "uuid": "a", "managed_id": 10 },
                    "spaces": [{ "uuid": "a", "managed_id": 10 }],
                },
                {
                    "identifier": "ext-1",
                    "current_space": { "uuid": "b", "managed_id": 20 },
                    "spaces": [{ "uuid": "b", "managed_id": 20 }],
                },
            ],
            "focused_display": "ext-1",
        }));

        assert_eq!(build_model(&raw).active_space_id, Some(20));
    }

    #[test]
    fn no_matching_display_leaves_active_unresolved() {
        let raw = snapshot(json!({
            "displays": [{
                "identifier": "ext-1",
                "current_space": { "uuid": "a", "managed_id": 1 },
                "spaces": [{ "uuid": "a", "managed_id": 1 }],
            }],
            "focused_display": "ext-2",
        }));

        assert_eq!(build_model(&raw).active_space_id, None);
    }

    #[test]
    fn all_fullscreen_display_yields_empty_space_list() {
        let raw = snapshot(json!({
            "displays": [{
                "identifier": "Main",
                "current_space": { "uuid": "fs-1", "managed_id": 1 },
                "spaces": [
                    { "uuid": "fs-1", "managed_id": 1, "is_fullscreen": true },
                    { "uuid": "fs-2", "managed_id": 2, "is_fullscreen": true },
                ],
            }],
        }));

        let model = build_model(&raw);
        assert_eq!(model.displays.len(), 1);
        assert!(model.displays[0].spaces.is_empty());
    }
}
