//! Timelines, tracks and time-positioned elements.
//!
//! Each chapter owns at most one [`Timeline`]; a timeline holds ordered
//! [`Track`]s, each bound to a region by id, and each track holds ordered
//! [`Element`]s referencing an asset. Times are seconds.
//!
//! Element order inside a track is insertion order chosen by the caller;
//! [`Track::elements_by_offset`] gives the rendering order.

use log::debug;
use serde::{Deserialize, Serialize};

use super::access_path;
use super::chapter::Chapter;
use crate::core::action::Action;
use crate::core::ids;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    /// Asset this element plays.
    pub component_id: String,
    /// Start time within the track.
    pub offset: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Element {
    pub fn end(&self) -> f64 {
        self.offset + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    /// Region the track renders into.
    pub region_id: String,
    /// Advisory only: the editor stops dragging elements of a locked track,
    /// the reducer does not.
    pub locked: bool,
    pub elements: Vec<Element>,
}

impl Track {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements_by_offset(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        sorted
    }

    /// Time at which the last element ends.
    pub fn end(&self) -> f64 {
        self.elements.iter().map(Element::end).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: String,
    pub chapter_id: String,
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new(chapter_id: impl Into<String>, timeline_id: Option<&str>) -> Self {
        Self {
            id: ids::supplied_or_new(timeline_id),
            chapter_id: chapter_id.into(),
            tracks: Vec::new(),
        }
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn duration(&self) -> f64 {
        self.tracks.iter().map(Track::end).fold(0.0, f64::max)
    }

    fn push_track(&mut self, region_id: &str, locked: bool, track_id: Option<&str>) -> bool {
        if let Some(id) = track_id {
            if self.track(id).is_some() {
                debug!("track {} already on timeline {}", id, self.id);
                return false;
            }
        }
        self.tracks.push(Track {
            id: ids::supplied_or_new(track_id),
            region_id: region_id.to_string(),
            locked,
            elements: Vec::new(),
        });
        true
    }
}

/// Timeline reducer. `chapters` is the chapter tree of the same snapshot,
/// needed to resolve access paths. Returns `None` if nothing changed.
pub fn reduce(timelines: &[Timeline], chapters: &[Chapter], action: &Action) -> Option<Vec<Timeline>> {
    match action {
        Action::AddTimeline { chapter_id, timeline_id } => {
            if timelines.iter().any(|t| t.chapter_id == *chapter_id) {
                debug!("ADD_TIMELINE: chapter {} already has a timeline", chapter_id);
                return None;
            }
            if let Some(id) = timeline_id {
                if timelines.iter().any(|t| t.id == *id) {
                    debug!("ADD_TIMELINE: timeline {} already exists", id);
                    return None;
                }
            }
            let mut next = timelines.to_vec();
            next.push(Timeline::new(chapter_id.as_str(), timeline_id.as_deref()));
            Some(next)
        }
        Action::RemoveTimeline { timeline_id } => {
            let idx = find(timelines, timeline_id, action)?;
            let mut next = timelines.to_vec();
            next.remove(idx);
            Some(next)
        }
        Action::AddTimelineTrack { timeline_id, region_id, locked, track_id } => {
            let idx = find(timelines, timeline_id, action)?;
            let mut next = timelines.to_vec();
            next[idx].push_track(region_id, *locked, track_id.as_deref()).then_some(next)
        }
        Action::AddTimelineTrackToChapter { access_path, region_id, locked, track_id } => {
            let Some(chapter) = access_path::resolve(chapters, access_path) else {
                debug!("{}: access path {:?} did not resolve", action.kind(), access_path);
                return None;
            };
            let mut next = timelines.to_vec();
            let idx = match next.iter().position(|t| t.chapter_id == chapter.id) {
                Some(idx) => idx,
                None => {
                    next.push(Timeline::new(chapter.id.as_str(), None));
                    next.len() - 1
                }
            };
            next[idx].push_track(region_id, *locked, track_id.as_deref()).then_some(next)
        }
        Action::RemoveTimelineTrack { timeline_id, track_id } => {
            edit_timeline(timelines, timeline_id, action, |timeline| {
                let before = timeline.tracks.len();
                timeline.tracks.retain(|t| t.id != *track_id);
                timeline.tracks.len() != before
            })
        }
        Action::AddElementToTimelineTrack {
            timeline_id,
            track_id,
            component_id,
            duration,
            offset,
            insert_position,
            preview_url,
            element_id,
        } => edit_track(timelines, timeline_id, track_id, action, |track| {
            if let Some(id) = element_id {
                if track.element(id).is_some() {
                    return false;
                }
            }
            let element = Element {
                id: ids::supplied_or_new(element_id.as_deref()),
                component_id: component_id.clone(),
                offset: *offset,
                duration: *duration,
                preview_url: preview_url.clone(),
            };
            match usize::try_from(*insert_position) {
                Ok(pos) if pos < track.elements.len() => track.elements.insert(pos, element),
                _ => track.elements.push(element),
            }
            true
        }),
        Action::UpdateElementOffset { timeline_id, track_id, element_id, offset } => {
            edit_element(timelines, timeline_id, track_id, element_id, action, |e| e.offset = *offset)
        }
        Action::UpdateElementLength { timeline_id, track_id, element_id, length } => {
            edit_element(timelines, timeline_id, track_id, element_id, action, |e| e.duration = *length)
        }
        Action::RemoveElement { timeline_id, track_id, element_id } => {
            edit_track(timelines, timeline_id, track_id, action, |track| {
                let before = track.elements.len();
                track.elements.retain(|e| e.id != *element_id);
                track.elements.len() != before
            })
        }
        Action::ToggleTrackLock { timeline_id, track_id } => {
            edit_track(timelines, timeline_id, track_id, action, |track| {
                track.locked = !track.locked;
                true
            })
        }
        _ => None,
    }
}

fn find(timelines: &[Timeline], timeline_id: &str, action: &Action) -> Option<usize> {
    let idx = timelines.iter().position(|t| t.id == timeline_id);
    if idx.is_none() {
        debug!("{}: unknown timeline {}", action.kind(), timeline_id);
    }
    idx
}

fn edit_timeline(
    timelines: &[Timeline],
    timeline_id: &str,
    action: &Action,
    op: impl FnOnce(&mut Timeline) -> bool,
) -> Option<Vec<Timeline>> {
    let idx = find(timelines, timeline_id, action)?;
    let mut next = timelines.to_vec();
    if op(&mut next[idx]) {
        Some(next)
    } else {
        debug!("{}: no-op on timeline {}", action.kind(), timeline_id);
        None
    }
}

fn edit_track(
    timelines: &[Timeline],
    timeline_id: &str,
    track_id: &str,
    action: &Action,
    op: impl FnOnce(&mut Track) -> bool,
) -> Option<Vec<Timeline>> {
    edit_timeline(timelines, timeline_id, action, |timeline| {
        match timeline.tracks.iter_mut().find(|t| t.id == track_id) {
            Some(track) => op(track),
            None => false,
        }
    })
}

fn edit_element(
    timelines: &[Timeline],
    timeline_id: &str,
    track_id: &str,
    element_id: &str,
    action: &Action,
    op: impl FnOnce(&mut Element),
) -> Option<Vec<Timeline>> {
    edit_track(timelines, timeline_id, track_id, action, |track| {
        match track.elements.iter_mut().find(|e| e.id == element_id) {
            Some(element) => {
                op(element);
                true
            }
            None => false,
        }
    })
}
