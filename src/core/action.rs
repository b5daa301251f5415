//! The closed set of primitive actions.
//!
//! Every mutation of the document enters the store as one of these. The JSON
//! form is a tagged record: `{"type": "SPLIT_REGION", "payload": {...}}`, with
//! camelCase payload fields, so action logs recorded by other front ends can be
//! replayed unchanged.
//!
//! Optional `*_id` fields let a loader replay a saved document with its
//! original identifiers; when absent the reducer generates a fresh one.

use serde::{Deserialize, Serialize};

use crate::core::payload::ChapterTree;
use crate::entities::access_path::AccessPath;
use crate::entities::screen::{DeviceKind, Orientation, SplitOrientation};

fn default_true() -> bool {
    true
}

fn default_insert_position() -> i64 {
    -1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // === Document ===
    AssignDocumentId {
        document_id: String,
        #[serde(default)]
        base_url: String,
    },

    // === Assets ===
    AddAsset {
        id: String,
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        preview_url: String,
        #[serde(default)]
        duration: f64,
    },
    RemoveAsset {
        id: String,
    },

    // === Master layouts ===
    AddMasterLayout {
        name: String,
        master_id: Option<String>,
    },
    RemoveMasterLayout {
        master_id: String,
    },

    // === Chapter tree ===
    AddChapterBefore {
        access_path: AccessPath,
    },
    AddChapterAfter {
        access_path: AccessPath,
    },
    AddChapterChild {
        access_path: AccessPath,
    },
    RemoveChapter {
        access_path: AccessPath,
    },
    RenameChapter {
        access_path: AccessPath,
        name: String,
    },
    AssignMasterLayout {
        access_path: AccessPath,
        master_id: String,
    },
    UnassignMasterLayout {
        access_path: AccessPath,
        master_id: String,
    },
    LoadChapterTree {
        tree: ChapterTree,
    },

    // === Devices and regions ===
    AddDevice {
        kind: DeviceKind,
        name: Option<String>,
        orientation: Option<Orientation>,
        #[serde(default = "default_true")]
        create_root_region: bool,
        device_id: Option<String>,
    },
    RemoveDevice {
        id: String,
    },
    SplitRegion {
        screen_id: String,
        region_id: String,
        orientation: SplitOrientation,
        position: f64,
    },
    MergeRegions {
        screen_id: String,
        region_id1: String,
        region_id2: String,
    },
    UndoLastSplit {
        screen_id: String,
    },
    UpdateSelectedScreen {
        screen_id: Option<String>,
    },
    PlaceRegionOnScreen {
        screen_id: String,
        position: [f64; 2],
        size: [f64; 2],
        region_id: Option<String>,
        name: Option<String>,
        color: Option<String>,
    },

    // === Timelines, tracks, elements ===
    AddTimeline {
        chapter_id: String,
        timeline_id: Option<String>,
    },
    RemoveTimeline {
        timeline_id: String,
    },
    AddTimelineTrack {
        timeline_id: String,
        region_id: String,
        #[serde(default)]
        locked: bool,
        track_id: Option<String>,
    },
    AddTimelineTrackToChapter {
        access_path: AccessPath,
        region_id: String,
        #[serde(default)]
        locked: bool,
        track_id: Option<String>,
    },
    RemoveTimelineTrack {
        timeline_id: String,
        track_id: String,
    },
    AddElementToTimelineTrack {
        timeline_id: String,
        track_id: String,
        component_id: String,
        duration: f64,
        #[serde(default)]
        offset: f64,
        /// Index to insert at; `-1` (or anything out of range) appends.
        #[serde(default = "default_insert_position")]
        insert_position: i64,
        preview_url: Option<String>,
        element_id: Option<String>,
    },
    UpdateElementOffset {
        timeline_id: String,
        track_id: String,
        element_id: String,
        offset: f64,
    },
    UpdateElementLength {
        timeline_id: String,
        track_id: String,
        element_id: String,
        length: f64,
    },
    RemoveElement {
        timeline_id: String,
        track_id: String,
        element_id: String,
    },
    ToggleTrackLock {
        timeline_id: String,
        track_id: String,
    },
}

impl Action {
    /// Wire tag of this action, e.g. `"SPLIT_REGION"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AssignDocumentId { .. } => "ASSIGN_DOCUMENT_ID",
            Action::AddAsset { .. } => "ADD_ASSET",
            Action::RemoveAsset { .. } => "REMOVE_ASSET",
            Action::AddMasterLayout { .. } => "ADD_MASTER_LAYOUT",
            Action::RemoveMasterLayout { .. } => "REMOVE_MASTER_LAYOUT",
            Action::AddChapterBefore { .. } => "ADD_CHAPTER_BEFORE",
            Action::AddChapterAfter { .. } => "ADD_CHAPTER_AFTER",
            Action::AddChapterChild { .. } => "ADD_CHAPTER_CHILD",
            Action::RemoveChapter { .. } => "REMOVE_CHAPTER",
            Action::RenameChapter { .. } => "RENAME_CHAPTER",
            Action::AssignMasterLayout { .. } => "ASSIGN_MASTER_LAYOUT",
            Action::UnassignMasterLayout { .. } => "UNASSIGN_MASTER_LAYOUT",
            Action::LoadChapterTree { .. } => "LOAD_CHAPTER_TREE",
            Action::AddDevice { .. } => "ADD_DEVICE",
            Action::RemoveDevice { .. } => "REMOVE_DEVICE",
            Action::SplitRegion { .. } => "SPLIT_REGION",
            Action::MergeRegions { .. } => "MERGE_REGIONS",
            Action::UndoLastSplit { .. } => "UNDO_LAST_SPLIT",
            Action::UpdateSelectedScreen { .. } => "UPDATE_SELECTED_SCREEN",
            Action::PlaceRegionOnScreen { .. } => "PLACE_REGION_ON_SCREEN",
            Action::AddTimeline { .. } => "ADD_TIMELINE",
            Action::RemoveTimeline { .. } => "REMOVE_TIMELINE",
            Action::AddTimelineTrack { .. } => "ADD_TIMELINE_TRACK",
            Action::AddTimelineTrackToChapter { .. } => "ADD_TIMELINE_TRACK_TO_CHAPTER",
            Action::RemoveTimelineTrack { .. } => "REMOVE_TIMELINE_TRACK",
            Action::AddElementToTimelineTrack { .. } => "ADD_ELEMENT_TO_TIMELINE_TRACK",
            Action::UpdateElementOffset { .. } => "UPDATE_ELEMENT_OFFSET",
            Action::UpdateElementLength { .. } => "UPDATE_ELEMENT_LENGTH",
            Action::RemoveElement { .. } => "REMOVE_ELEMENT",
            Action::ToggleTrackLock { .. } => "TOGGLE_TRACK_LOCK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_is_type_and_payload() {
        let action = Action::SplitRegion {
            screen_id: "s1".into(),
            region_id: "r1".into(),
            orientation: SplitOrientation::Horizontal,
            position: 0.5,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "SPLIT_REGION",
                "payload": {"screenId": "s1", "regionId": "r1", "orientation": "horizontal", "position": 0.5}
            })
        );
        assert_eq!(value["type"], action.kind());
    }

    #[test]
    fn test_defaults_fill_omitted_fields() {
        let action: Action = serde_json::from_value(json!({
            "type": "ADD_ELEMENT_TO_TIMELINE_TRACK",
            "payload": {"timelineId": "t", "trackId": "k", "componentId": "c", "duration": 4.0}
        }))
        .unwrap();
        match action {
            Action::AddElementToTimelineTrack { offset, insert_position, preview_url, element_id, .. } => {
                assert_eq!(offset, 0.0);
                assert_eq!(insert_position, -1);
                assert!(preview_url.is_none());
                assert!(element_id.is_none());
            }
            other => panic!("unexpected action {other:?}"),
        }

        let device: Action = serde_json::from_value(json!({
            "type": "ADD_DEVICE",
            "payload": {"kind": "communal"}
        }))
        .unwrap();
        assert!(matches!(device, Action::AddDevice { create_root_region: true, .. }));
    }

    #[test]
    fn test_numbered_fields_keep_suffix() {
        let value = serde_json::to_value(Action::MergeRegions {
            screen_id: "s".into(),
            region_id1: "a".into(),
            region_id2: "b".into(),
        })
        .unwrap();
        assert_eq!(value["payload"]["regionId1"], "a");
        assert_eq!(value["payload"]["regionId2"], "b");
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let result: Result<Action, _> = serde_json::from_value(json!({"type": "FORMAT_DISK", "payload": {}}));
        assert!(result.is_err());
    }
}
