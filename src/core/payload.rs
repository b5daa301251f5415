//! Already-parsed document payloads handed to the load path.
//!
//! These mirror the JSON served by the document API: an asset list, a layout
//! (devices with areas, plus the shared region catalogue) and a recursive
//! chapter tree carrying each chapter's tracks.

use serde::{Deserialize, Serialize};

use crate::entities::screen::{DeviceKind, Orientation};

/// Media asset a timeline element can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default)]
    pub duration: f64,
}

/// Placement of a catalogue region on one device, in screen fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPayload {
    pub region: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub orientation: Orientation,
    #[serde(default)]
    pub areas: Vec<AreaPayload>,
}

/// Region catalogue entry, shared by every device that places it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPayload {
    #[serde(default)]
    pub devices: Vec<DevicePayload>,
    #[serde(default)]
    pub regions: Vec<RegionPayload>,
}

impl LayoutPayload {
    pub fn region(&self, id: &str) -> Option<&RegionPayload> {
        self.regions.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementPayload {
    /// Asset id the element plays.
    pub asset: String,
    pub duration: f64,
    #[serde(default)]
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPayload {
    pub id: String,
    /// Region id the track renders into.
    pub region: String,
    #[serde(default)]
    pub elements: Vec<ElementPayload>,
}

/// One chapter with its tracks and nested sub-chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterTree {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<TrackPayload>,
    #[serde(default)]
    pub chapters: Vec<ChapterTree>,
}

impl ChapterTree {
    /// Visit this chapter and all descendants in pre-order.
    pub fn for_each<'a>(&'a self, visit: &mut impl FnMut(&'a ChapterTree)) {
        visit(self);
        for child in &self.chapters {
            child.for_each(visit);
        }
    }
}
