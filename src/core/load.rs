//! Bulk-load path: seeds an empty store from a fetched document.
//!
//! The caller does the I/O and hands over JSON text or parsed payloads;
//! everything reaches the state through ordinary actions and compound
//! operations, inside one batch.

use log::{info, warn};
use thiserror::Error;

use super::action::Action;
use super::orchestrator::{self, RegionSpec};
use super::payload::{AssetPayload, ChapterTree, LayoutPayload};
use super::store::Store;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Device '{device}' places unknown region '{region}'")]
    UnknownRegion { device: String, region: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip tracks that arrive without elements.
    pub prune_empty_tracks: bool,
}

/// Asset list, layout and chapter tree of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPayload {
    pub assets: Vec<AssetPayload>,
    pub layout: LayoutPayload,
    pub chapters: ChapterTree,
}

impl DocumentPayload {
    pub fn from_json(assets: &str, layout: &str, chapters: &str) -> Result<Self, LoadError> {
        Ok(Self {
            assets: serde_json::from_str(assets)?,
            layout: serde_json::from_str(layout)?,
            chapters: serde_json::from_str(chapters)?,
        })
    }

    /// Every area must point at a region of the catalogue.
    pub fn validate(&self) -> Result<(), LoadError> {
        for device in &self.layout.devices {
            if let Some(area) = device.areas.iter().find(|a| self.layout.region(&a.region).is_none()) {
                return Err(LoadError::UnknownRegion { device: device.name.clone(), region: area.region.clone() });
            }
        }
        Ok(())
    }
}

/// Parse a JSON array of actions, e.g. a recorded editing session.
pub fn parse_actions(json: &str) -> Result<Vec<Action>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Seed `store`: assets, then devices with their regions, then the chapter
/// tree, then timelines. Returns `Ok(false)` if a compound step aborted; the
/// steps before it stay applied.
pub fn load_document(store: &mut Store, doc: &DocumentPayload, options: LoadOptions) -> Result<bool, LoadError> {
    doc.validate()?;

    let completed = store.batch(|store| {
        for asset in &doc.assets {
            store.dispatch(Action::AddAsset {
                id: asset.id.clone(),
                name: asset.name.clone(),
                description: asset.description.clone(),
                preview_url: asset.preview_url.clone(),
                duration: asset.duration,
            });
        }

        for device in &doc.layout.devices {
            let regions: Vec<RegionSpec> = device
                .areas
                .iter()
                .filter_map(|area| {
                    let region = doc.layout.region(&area.region)?;
                    Some(RegionSpec {
                        region_id: Some(region.id.clone()),
                        name: Some(region.name.clone()),
                        color: (!region.color.is_empty()).then(|| region.color.clone()),
                        position: [area.x, area.y],
                        size: [area.w, area.h],
                    })
                })
                .collect();
            let placed = orchestrator::add_device_and_place_regions(
                store,
                device.kind,
                Some(device.name.clone()),
                Some(device.orientation),
                &regions,
            );
            if !placed {
                return false;
            }
        }

        store.dispatch(Action::LoadChapterTree { tree: doc.chapters.clone() });
        orchestrator::load_timelines(store, &doc.chapters, options.prune_empty_tracks)
    });

    let state = store.state();
    if completed {
        info!(
            "Loaded document: {} assets, {} devices, {} chapters, {} timelines (revision {})",
            state.assets.len(),
            state.screens.preview_screens.len(),
            state.chapter_count(),
            state.timelines.len(),
            state.revision
        );
    } else {
        warn!("Document load stopped early at revision {}", state.revision);
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DeviceKind, Orientation};

    const ASSETS: &str = r#"[
        {"id": "a1", "name": "Opening", "description": "", "previewUrl": "https://cdn/a1.jpg", "duration": 12.0},
        {"id": "a2", "name": "Poll", "description": "Audience poll", "previewUrl": "", "duration": 30.0}
    ]"#;

    const LAYOUT: &str = r##"{
        "devices": [
            {"name": "Stage", "type": "communal", "orientation": "landscape",
             "areas": [{"region": "main", "x": 0, "y": 0, "w": 1, "h": 1}]},
            {"name": "Phone", "type": "personal", "orientation": "portrait",
             "areas": [{"region": "main", "x": 0, "y": 0, "w": 1, "h": 0.6},
                       {"region": "side", "x": 0, "y": 0.6, "w": 1, "h": 0.4}]}
        ],
        "regions": [
            {"id": "main", "name": "Main", "color": "#ff6b6b"},
            {"id": "side", "name": "Side", "color": ""}
        ]
    }"##;

    const CHAPTERS: &str = r#"{
        "id": "root", "name": "Keynote",
        "tracks": [{"id": "t0", "region": "main", "elements": [{"asset": "a1", "duration": 12}]}],
        "chapters": [
            {"id": "c1", "name": "Q&A",
             "tracks": [{"id": "t1", "region": "side", "elements": [{"asset": "a2", "duration": 30, "offset": 5}]}],
             "chapters": []}
        ]
    }"#;

    fn payload() -> DocumentPayload {
        DocumentPayload::from_json(ASSETS, LAYOUT, CHAPTERS).unwrap()
    }

    #[test]
    fn test_load_document() {
        let mut store = Store::new();
        assert!(load_document(&mut store, &payload(), LoadOptions::default()).unwrap());

        let state = store.state();
        assert_eq!(state.assets.len(), 2);

        let screens = &state.screens.preview_screens;
        assert_eq!(screens.len(), 2);
        assert_eq!(screens[0].kind, DeviceKind::Communal);
        assert_eq!(screens[1].orientation, Orientation::Portrait);
        let phone: Vec<&str> = screens[1].leaves().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(phone, vec!["main", "side"]);
        assert_eq!(screens[1].find_leaf("main").map(|l| l.size), Some([1.0, 0.6]));

        assert_eq!(state.path_of_chapter("c1"), Some(vec![0, 0]));
        let c1 = state.timeline_for_chapter("c1").unwrap();
        let element = &c1.track("t1").unwrap().elements[0];
        assert_eq!(element.component_id, "a2");
        assert_eq!(element.offset, 5.0);
        assert_eq!(element.preview_url, None);

        let root = state.timeline_for_chapter("root").unwrap();
        assert_eq!(root.tracks[0].elements[0].preview_url.as_deref(), Some("https://cdn/a1.jpg"));

        // Observers see one commit for the whole load.
        assert_eq!(store.poll().len(), 1);
    }

    #[test]
    fn test_unknown_region_is_rejected_before_dispatch() {
        let mut doc = payload();
        doc.layout.regions.retain(|r| r.id != "side");

        let mut store = Store::new();
        let err = load_document(&mut store, &doc, LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownRegion { ref region, .. } if region == "side"));
        assert_eq!(store.state().revision, 0);
    }

    #[test]
    fn test_bad_json() {
        let err = DocumentPayload::from_json("[", LAYOUT, CHAPTERS).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_prune_empty_tracks() {
        let mut doc = payload();
        doc.chapters.chapters[0].tracks[0].elements.clear();

        let mut store = Store::new();
        let options = LoadOptions { prune_empty_tracks: true };
        assert!(load_document(&mut store, &doc, options).unwrap());
        let state = store.state();
        assert!(state.timeline_for_chapter("c1").unwrap().tracks.is_empty());
    }

    #[test]
    fn test_parse_actions() {
        let actions = parse_actions(
            r#"[{"type": "ADD_CHAPTER_CHILD", "payload": {"accessPath": []}},
                {"type": "RENAME_CHAPTER", "payload": {"accessPath": [0], "name": "Intro"}}]"#,
        )
        .unwrap();
        let mut store = Store::new();
        for action in actions {
            store.dispatch(action);
        }
        assert_eq!(store.state().chapters[0].name, "Intro");
    }
}
