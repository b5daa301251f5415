//! Compound operations: sequences of primitive actions with read-back.
//!
//! Each operation runs inside [`Store::batch`], so observers only see the
//! snapshot after the last step. Steps are independent dispatches: when a
//! read-back finds nothing the remaining steps are skipped and whatever was
//! already applied stays applied. Every operation returns `true` if it ran
//! to the end.
//!
//! Identifiers generated by a step are recovered by recency (the last device,
//! the last track of a timeline), which holds because the store has a single
//! writer.

use log::{debug, warn};

use super::action::Action;
use super::payload::ChapterTree;
use super::store::Store;
use crate::entities::{DeviceKind, Orientation};

/// A region to place at an explicit geometry on a new device.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSpec {
    pub region_id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub position: [f64; 2],
    pub size: [f64; 2],
}

/// Element parameters for [`add_track_and_add_element`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub component_id: String,
    pub duration: f64,
    pub offset: f64,
    pub preview_url: Option<String>,
    /// Id to replay; generated when absent.
    pub element_id: Option<String>,
}

/// Create a device without a root region, then place `regions` on it.
pub fn add_device_and_place_regions(
    store: &mut Store,
    kind: DeviceKind,
    name: Option<String>,
    orientation: Option<Orientation>,
    regions: &[RegionSpec],
) -> bool {
    store.batch(|store| {
        store.dispatch(Action::AddDevice {
            kind,
            name,
            orientation,
            create_root_region: false,
            device_id: None,
        });
        let Some(screen_id) = store.state().screens.last().map(|s| s.id.clone()) else {
            warn!("add-device-and-place-regions: no device after ADD_DEVICE, aborting");
            return false;
        };
        for spec in regions {
            store.dispatch(Action::PlaceRegionOnScreen {
                screen_id: screen_id.clone(),
                position: spec.position,
                size: spec.size,
                region_id: spec.region_id.clone(),
                name: spec.name.clone(),
                color: spec.color.clone(),
            });
        }
        debug!("device {} placed {} regions", screen_id, regions.len());
        true
    })
}

/// Append a track bound to `region_id`, then put one element into it.
///
/// The element goes into the timeline's last track. When `track_id` names a
/// track that already exists the track step changes nothing, so the element
/// lands in whichever track is last at that point.
pub fn add_track_and_add_element(
    store: &mut Store,
    timeline_id: &str,
    region_id: &str,
    track_id: Option<String>,
    element: ElementSpec,
) -> bool {
    store.batch(|store| {
        store.dispatch(Action::AddTimelineTrack {
            timeline_id: timeline_id.to_string(),
            region_id: region_id.to_string(),
            locked: false,
            track_id,
        });
        let state = store.state();
        let Some(track_id) = state.timeline(timeline_id).and_then(|t| t.tracks.last()).map(|t| t.id.clone()) else {
            warn!("add-track-and-add-element: timeline {} has no track to fill, aborting", timeline_id);
            return false;
        };
        store.dispatch(Action::AddElementToTimelineTrack {
            timeline_id: timeline_id.to_string(),
            track_id,
            component_id: element.component_id,
            duration: element.duration,
            offset: element.offset,
            insert_position: -1,
            preview_url: element.preview_url,
            element_id: element.element_id,
        });
        true
    })
}

/// Remove an element; if its track is left empty, remove the track too.
/// The timeline itself is never pruned.
pub fn remove_element_and_update_track(store: &mut Store, timeline_id: &str, track_id: &str, element_id: &str) -> bool {
    store.batch(|store| {
        store.dispatch(Action::RemoveElement {
            timeline_id: timeline_id.to_string(),
            track_id: track_id.to_string(),
            element_id: element_id.to_string(),
        });
        let state = store.state();
        let Some(track) = state.timeline(timeline_id).and_then(|t| t.track(track_id)) else {
            warn!("remove-element-and-update-track: track {} not found on timeline {}, aborting", track_id, timeline_id);
            return false;
        };
        if track.elements.is_empty() {
            store.dispatch(Action::RemoveTimelineTrack {
                timeline_id: timeline_id.to_string(),
                track_id: track_id.to_string(),
            });
        }
        true
    })
}

/// Create the timelines, tracks and elements a chapter payload carries.
///
/// Chapters are visited in pre-order. Track ids come from the payload, so
/// loading the same tree twice adds nothing the second time: a track that
/// already exists keeps its elements. With `prune_empty` tracks without
/// elements are skipped.
pub fn load_timelines(store: &mut Store, tree: &ChapterTree, prune_empty: bool) -> bool {
    let mut chapters = Vec::new();
    tree.for_each(&mut |chapter| chapters.push(chapter));

    store.batch(|store| {
        for chapter in chapters {
            store.dispatch(Action::AddTimeline { chapter_id: chapter.id.clone(), timeline_id: None });
            let Some(timeline_id) = store.state().timeline_for_chapter(&chapter.id).map(|t| t.id.clone()) else {
                warn!("load-timelines: no timeline for chapter {}, aborting", chapter.id);
                return false;
            };

            for track in &chapter.tracks {
                if prune_empty && track.elements.is_empty() {
                    debug!("load-timelines: skipping empty track {}", track.id);
                    continue;
                }
                let added = store.dispatch(Action::AddTimelineTrack {
                    timeline_id: timeline_id.clone(),
                    region_id: track.region.clone(),
                    locked: false,
                    track_id: Some(track.id.clone()),
                });
                if !added {
                    if store.state().timeline(&timeline_id).and_then(|t| t.track(&track.id)).is_none() {
                        warn!("load-timelines: track {} could not be added, aborting", track.id);
                        return false;
                    }
                    debug!("load-timelines: track {} already loaded", track.id);
                    continue;
                }

                for element in &track.elements {
                    let preview_url = store
                        .state()
                        .asset(&element.asset)
                        .map(|a| a.preview_url.clone())
                        .filter(|url| !url.is_empty());
                    store.dispatch(Action::AddElementToTimelineTrack {
                        timeline_id: timeline_id.clone(),
                        track_id: track.id.clone(),
                        component_id: element.asset.clone(),
                        duration: element.duration,
                        offset: element.offset,
                        insert_position: -1,
                        preview_url,
                        element_id: None,
                    });
                }
            }
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload::{ElementPayload, TrackPayload};
    use std::sync::Arc;

    fn store_with_timeline() -> Store {
        let mut store = Store::new();
        store.dispatch(Action::AddTimeline { chapter_id: "c1".into(), timeline_id: Some("T".into()) });
        store.dispatch(Action::AddTimelineTrack {
            timeline_id: "T".into(),
            region_id: "r".into(),
            locked: false,
            track_id: Some("Trk".into()),
        });
        store.poll();
        store
    }

    fn add_element(store: &mut Store, id: &str) {
        store.dispatch(Action::AddElementToTimelineTrack {
            timeline_id: "T".into(),
            track_id: "Trk".into(),
            component_id: "asset".into(),
            duration: 3.0,
            offset: 0.0,
            insert_position: -1,
            preview_url: None,
            element_id: Some(id.into()),
        });
    }

    fn clip(component: &str) -> ElementSpec {
        ElementSpec { component_id: component.into(), duration: 5.0, offset: 2.0, preview_url: None, element_id: None }
    }

    #[test]
    fn test_removing_last_element_prunes_track() {
        let mut store = store_with_timeline();
        add_element(&mut store, "E");

        assert!(remove_element_and_update_track(&mut store, "T", "Trk", "E"));
        let state = store.state();
        let timeline = state.timeline("T").unwrap();
        assert!(timeline.tracks.is_empty());
    }

    #[test]
    fn test_removing_other_element_keeps_track() {
        let mut store = store_with_timeline();
        add_element(&mut store, "E1");
        add_element(&mut store, "E2");

        assert!(remove_element_and_update_track(&mut store, "T", "Trk", "E1"));
        let state = store.state();
        let track = state.timeline("T").and_then(|t| t.track("Trk")).unwrap();
        assert_eq!(track.elements.len(), 1);
        assert_eq!(track.elements[0].id, "E2");
    }

    #[test]
    fn test_remove_element_from_unknown_track_aborts() {
        let mut store = store_with_timeline();
        let before = store.state();
        assert!(!remove_element_and_update_track(&mut store, "T", "ghost", "E"));
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn test_add_track_and_add_element() {
        let mut store = store_with_timeline();
        assert!(add_track_and_add_element(&mut store, "T", "r2", None, clip("asset-9")));

        let state = store.state();
        let timeline = state.timeline("T").unwrap();
        assert_eq!(timeline.tracks.len(), 2);
        let track = &timeline.tracks[1];
        assert_eq!(track.region_id, "r2");
        assert_eq!(track.elements[0].component_id, "asset-9");
        assert_eq!(track.elements[0].offset, 2.0);

        // One commit for both steps.
        let commits = store.poll();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].actions, vec!["ADD_TIMELINE_TRACK", "ADD_ELEMENT_TO_TIMELINE_TRACK"]);
    }

    #[test]
    fn test_add_track_to_unknown_timeline_aborts() {
        let mut store = store_with_timeline();
        assert!(!add_track_and_add_element(&mut store, "nope", "r", None, clip("a")));
        assert!(store.poll().is_empty());
    }

    #[test]
    fn test_add_track_and_add_element_with_supplied_ids() {
        let mut store = store_with_timeline();
        let element = ElementSpec { element_id: Some("E9".into()), ..clip("asset-9") };
        assert!(add_track_and_add_element(&mut store, "T", "r2", Some("Trk2".into()), element.clone()));

        let state = store.state();
        let track = state.timeline("T").and_then(|t| t.track("Trk2")).unwrap();
        assert_eq!(track.region_id, "r2");
        assert_eq!(track.elements[0].id, "E9");

        // Replaying the same call adds nothing.
        assert!(add_track_and_add_element(&mut store, "T", "r2", Some("Trk2".into()), element));
        assert!(Arc::ptr_eq(&state, &store.state()));
        assert_eq!(store.state().timeline("T").map(|t| t.tracks.len()), Some(2));
    }

    #[test]
    fn test_existing_track_id_fills_last_track() {
        let mut store = store_with_timeline();
        add_track_and_add_element(&mut store, "T", "r2", Some("Trk2".into()), clip("a"));

        // "Trk" exists, so the element goes to the last track, "Trk2".
        let element = ElementSpec { element_id: Some("late".into()), ..clip("b") };
        assert!(add_track_and_add_element(&mut store, "T", "r", Some("Trk".into()), element));
        let state = store.state();
        let timeline = state.timeline("T").unwrap();
        assert_eq!(timeline.tracks.len(), 2);
        assert!(timeline.track("Trk2").and_then(|t| t.element("late")).is_some());
        assert!(timeline.track("Trk").unwrap().elements.is_empty());
    }

    #[test]
    fn test_add_device_and_place_regions() {
        let mut store = Store::new();
        let regions = [
            RegionSpec {
                region_id: Some("top".into()),
                name: Some("Top".into()),
                color: Some("#111111".into()),
                position: [0.0, 0.0],
                size: [1.0, 0.5],
            },
            RegionSpec {
                region_id: Some("bottom".into()),
                name: None,
                color: None,
                position: [0.0, 0.5],
                size: [1.0, 0.5],
            },
        ];
        assert!(add_device_and_place_regions(&mut store, DeviceKind::Personal, Some("Phone".into()), None, &regions));

        let state = store.state();
        let screen = state.screens.last().unwrap();
        assert_eq!(screen.name, "Phone");
        assert_eq!(screen.orientation, Orientation::Portrait);
        let ids: Vec<&str> = screen.leaves().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "bottom"]);
        assert_eq!(screen.find_leaf("top").map(|l| l.color.as_str()), Some("#111111"));
        assert_eq!(store.poll().len(), 1);
    }

    #[test]
    fn test_load_timelines() {
        let mut store = Store::new();
        store.dispatch(Action::AddAsset {
            id: "a1".into(),
            name: "Intro clip".into(),
            description: String::new(),
            preview_url: "https://cdn/a1.jpg".into(),
            duration: 4.0,
        });

        let track = |id: &str, elements: Vec<ElementPayload>| TrackPayload {
            id: id.into(),
            region: "main".into(),
            elements,
        };
        let tree = ChapterTree {
            id: "root".into(),
            name: "Show".into(),
            tracks: vec![track("t-root", vec![ElementPayload { asset: "a1".into(), duration: 4.0, offset: 0.0 }])],
            chapters: vec![ChapterTree {
                id: "c1".into(),
                name: "One".into(),
                tracks: vec![
                    track(
                        "t-c1",
                        vec![
                            ElementPayload { asset: "a1".into(), duration: 2.0, offset: 0.0 },
                            ElementPayload { asset: "missing".into(), duration: 1.0, offset: 2.0 },
                        ],
                    ),
                    track("t-empty", Vec::new()),
                ],
                chapters: Vec::new(),
            }],
        };

        assert!(load_timelines(&mut store, &tree, false));
        let state = store.state();
        assert_eq!(state.timelines.len(), 2);
        assert_eq!(state.timelines[0].chapter_id, "root");

        let c1 = state.timeline_for_chapter("c1").unwrap();
        assert_eq!(c1.tracks.len(), 2);
        let elements = &c1.track("t-c1").unwrap().elements;
        assert_eq!(elements[0].preview_url.as_deref(), Some("https://cdn/a1.jpg"));
        assert_eq!(elements[1].preview_url, None);

        // Second load is a no-op.
        assert!(load_timelines(&mut store, &tree, false));
        assert!(Arc::ptr_eq(&state, &store.state()));

        let mut pruned = Store::new();
        assert!(load_timelines(&mut pruned, &tree, true));
        let c1 = pruned.state().timeline_for_chapter("c1").cloned().unwrap();
        assert!(c1.track("t-empty").is_none());
    }
}
