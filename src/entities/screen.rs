//! Devices (preview screens) and their region split-trees.
//!
//! A region is either a [`RegionLeaf`], which content renders into, or a
//! [`RegionSplit`], a binary partition of the area a leaf used to occupy.
//! Geometry is expressed in screen fractions: `position` is the top-left
//! corner and `size` the extent, both in `0.0..=1.0`.
//!
//! Orientation semantics:
//! - `Horizontal`: the divider runs horizontally, `first` sits above `second`
//!   and gets `split_position` of the height.
//! - `Vertical`: the divider runs vertically, `first` sits left of `second`
//!   and gets `split_position` of the width.
//!
//! A device created normally owns one full-screen root leaf. Devices built
//! from an imported layout instead hold free-standing leaves placed at
//! explicit geometry (see [`Action::PlaceRegionOnScreen`]); each of those is
//! the root of its own split-tree.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::ids;

/// Colors handed to regions created without one, cycled by leaf count.
pub const REGION_PALETTE: [&str; 8] = [
    "#4A90D9", "#D9534F", "#5CB85C", "#F0AD4E", "#9B59B6", "#1ABC9C", "#E67E22", "#7F8C8D",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Personal,
    Communal,
}

impl DeviceKind {
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Personal => "Personal",
            DeviceKind::Communal => "Communal",
        }
    }

    /// Orientation a new device of this kind gets when none is given.
    pub fn default_orientation(self) -> Orientation {
        match self {
            DeviceKind::Personal => Orientation::Portrait,
            DeviceKind::Communal => Orientation::Landscape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLeaf {
    pub id: String,
    pub name: String,
    pub color: String,
    pub position: [f64; 2],
    pub size: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSplit {
    pub orientation: SplitOrientation,
    /// Fraction of the split area given to `first`, in `(0, 1)`.
    pub split_position: f64,
    /// Geometry of the leaf this split replaced; restored on merge.
    pub position: [f64; 2],
    pub size: [f64; 2],
    pub first: Box<RegionNode>,
    pub second: Box<RegionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegionNode {
    Leaf(RegionLeaf),
    Split(RegionSplit),
}

impl RegionNode {
    pub fn as_leaf(&self) -> Option<&RegionLeaf> {
        match self {
            RegionNode::Leaf(leaf) => Some(leaf),
            RegionNode::Split(_) => None,
        }
    }

    /// Leaves in left-to-right (first-to-second) order.
    pub fn leaves(&self) -> Vec<&RegionLeaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a RegionLeaf>) {
        match self {
            RegionNode::Leaf(leaf) => out.push(leaf),
            RegionNode::Split(split) => {
                split.first.collect_leaves(out);
                split.second.collect_leaves(out);
            }
        }
    }

    pub fn find_leaf(&self, id: &str) -> Option<&RegionLeaf> {
        match self {
            RegionNode::Leaf(leaf) => (leaf.id == id).then_some(leaf),
            RegionNode::Split(split) => split.first.find_leaf(id).or_else(|| split.second.find_leaf(id)),
        }
    }

    /// The node holding leaf `id`, so the caller can replace it wholesale.
    fn leaf_node_mut(&mut self, id: &str) -> Option<&mut RegionNode> {
        if matches!(self, RegionNode::Leaf(leaf) if leaf.id == id) {
            return Some(self);
        }
        match self {
            RegionNode::Leaf(_) => None,
            RegionNode::Split(split) => match split.first.leaf_node_mut(id) {
                Some(node) => Some(node),
                None => split.second.leaf_node_mut(id),
            },
        }
    }

    /// The split whose two children are exactly the leaves `a` and `b`, in
    /// either order.
    fn sibling_split_mut(&mut self, a: &str, b: &str) -> Option<&mut RegionNode> {
        if let RegionNode::Split(split) = &*self {
            if let (Some(first), Some(second)) = (split.first.as_leaf(), split.second.as_leaf()) {
                let pair = (first.id.as_str(), second.id.as_str());
                if pair == (a, b) || pair == (b, a) {
                    return Some(self);
                }
            }
        }
        match self {
            RegionNode::Leaf(_) => None,
            RegionNode::Split(split) => match split.first.sibling_split_mut(a, b) {
                Some(node) => Some(node),
                None => split.second.sibling_split_mut(a, b),
            },
        }
    }
}

/// Depth-1 split history: enough to put the pre-split leaf back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRecord {
    pub original: RegionLeaf,
    pub second_id: String,
}

/// A device the presentation targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: String,
    pub kind: DeviceKind,
    pub name: String,
    pub orientation: Orientation,
    /// Top-level region trees: one full-screen root for a regular device,
    /// or the free-standing leaves of an imported layout.
    pub regions: Vec<RegionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_split: Option<SplitRecord>,
}

impl Screen {
    pub fn root_region(&self) -> Option<&RegionNode> {
        self.regions.first()
    }

    pub fn leaves(&self) -> Vec<&RegionLeaf> {
        self.regions.iter().flat_map(RegionNode::leaves).collect()
    }

    pub fn find_leaf(&self, id: &str) -> Option<&RegionLeaf> {
        self.regions.iter().find_map(|node| node.find_leaf(id))
    }

    fn leaf_node_mut(&mut self, id: &str) -> Option<&mut RegionNode> {
        self.regions.iter_mut().find_map(|node| node.leaf_node_mut(id))
    }

    fn sibling_split_mut(&mut self, a: &str, b: &str) -> Option<&mut RegionNode> {
        self.regions.iter_mut().find_map(|node| node.sibling_split_mut(a, b))
    }

    fn next_color(&self) -> String {
        REGION_PALETTE[self.leaves().len() % REGION_PALETTE.len()].to_string()
    }

    /// Replace leaf `region_id` by a split. Fails if the id is not a leaf or
    /// `position` is outside `(0, 1)`.
    fn split(&mut self, region_id: &str, orientation: SplitOrientation, position: f64) -> bool {
        if !(position > 0.0 && position < 1.0) {
            return false;
        }
        let color = self.next_color();
        let Some(node) = self.leaf_node_mut(region_id) else {
            return false;
        };
        let RegionNode::Leaf(original) = &*node else {
            return false;
        };
        let original = original.clone();

        let [x, y] = original.position;
        let [w, h] = original.size;
        let (first_geom, second_geom) = match orientation {
            SplitOrientation::Horizontal => (
                ([x, y], [w, h * position]),
                ([x, y + h * position], [w, h * (1.0 - position)]),
            ),
            SplitOrientation::Vertical => (
                ([x, y], [w * position, h]),
                ([x + w * position, y], [w * (1.0 - position), h]),
            ),
        };

        let first = RegionLeaf {
            position: first_geom.0,
            size: first_geom.1,
            ..original.clone()
        };
        let second = RegionLeaf {
            id: ids::generate(),
            name: String::new(),
            color,
            position: second_geom.0,
            size: second_geom.1,
        };
        let second_id = second.id.clone();

        *node = RegionNode::Split(RegionSplit {
            orientation,
            split_position: position,
            position: original.position,
            size: original.size,
            first: Box::new(RegionNode::Leaf(first)),
            second: Box::new(RegionNode::Leaf(second)),
        });
        self.last_split = Some(SplitRecord { original, second_id });
        true
    }

    /// Collapse two sibling leaves into one. The `first` child's id, name and
    /// color survive regardless of argument order; geometry comes from the
    /// split being collapsed.
    fn merge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let Some(node) = self.sibling_split_mut(a, b) else {
            return false;
        };
        let RegionNode::Split(split) = &*node else {
            return false;
        };
        let Some(first) = split.first.as_leaf() else {
            return false;
        };
        let merged = RegionLeaf {
            id: first.id.clone(),
            name: first.name.clone(),
            color: first.color.clone(),
            position: split.position,
            size: split.size,
        };
        *node = RegionNode::Leaf(merged);
        true
    }

    fn undo_last_split(&mut self) -> bool {
        let Some(record) = self.last_split.take() else {
            return false;
        };
        let Some(node) = self.sibling_split_mut(&record.original.id, &record.second_id) else {
            // The split was already merged or further subdivided.
            return false;
        };
        let current = match &*node {
            RegionNode::Split(split) => split.first.as_leaf().filter(|l| l.id == record.original.id),
            RegionNode::Leaf(_) => None,
        };
        let Some(current) = current else {
            return false;
        };
        // Labels set after the split carry over; geometry is the pre-split one.
        let restored = RegionLeaf {
            name: current.name.clone(),
            color: current.color.clone(),
            ..record.original
        };
        *node = RegionNode::Leaf(restored);
        true
    }

    fn place_region(
        &mut self,
        position: [f64; 2],
        size: [f64; 2],
        region_id: Option<&str>,
        name: Option<&str>,
        color: Option<&str>,
    ) {
        if let Some(id) = region_id {
            let top_level = self
                .regions
                .iter()
                .any(|node| matches!(node, RegionNode::Leaf(leaf) if leaf.id == id));
            if let Some(RegionNode::Leaf(leaf)) = self.leaf_node_mut(id) {
                if let Some(name) = name {
                    leaf.name = name.to_string();
                }
                if let Some(color) = color {
                    leaf.color = color.to_string();
                }
                // Nested leaves keep the geometry their split ancestry dictates.
                if top_level {
                    leaf.position = position;
                    leaf.size = size;
                }
                return;
            }
        }

        let color = color.map(str::to_string).unwrap_or_else(|| self.next_color());
        self.regions.push(RegionNode::Leaf(RegionLeaf {
            id: ids::supplied_or_new(region_id),
            name: name.unwrap_or_default().to_string(),
            color,
            position,
            size,
        }));
    }
}

/// All devices plus the one currently selected in the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenState {
    /// Devices in creation order.
    pub preview_screens: Vec<Screen>,
    pub selected_screen: Option<String>,
}

impl ScreenState {
    pub fn screen(&self, id: &str) -> Option<&Screen> {
        self.preview_screens.iter().find(|s| s.id == id)
    }

    /// Most recently appended device.
    pub fn last(&self) -> Option<&Screen> {
        self.preview_screens.last()
    }

    fn edit_screen(&self, screen_id: &str, action: &Action, op: impl FnOnce(&mut Screen) -> bool) -> Option<ScreenState> {
        let Some(idx) = self.preview_screens.iter().position(|s| s.id == screen_id) else {
            debug!("{}: unknown screen {}", action.kind(), screen_id);
            return None;
        };
        let mut next = self.clone();
        if op(&mut next.preview_screens[idx]) {
            Some(next)
        } else {
            debug!("{}: no-op on screen {}", action.kind(), screen_id);
            None
        }
    }
}

/// Screens reducer. Returns the new state, or `None` if unchanged.
pub fn reduce(state: &ScreenState, action: &Action) -> Option<ScreenState> {
    match action {
        Action::AddDevice { kind, name, orientation, create_root_region, device_id } => {
            if let Some(id) = device_id {
                if state.screen(id).is_some() {
                    debug!("ADD_DEVICE: device {} already exists", id);
                    return None;
                }
            }
            let nth = state.preview_screens.iter().filter(|s| s.kind == *kind).count() + 1;
            let regions = if *create_root_region {
                vec![RegionNode::Leaf(RegionLeaf {
                    id: ids::generate(),
                    name: String::new(),
                    color: REGION_PALETTE[0].to_string(),
                    position: [0.0, 0.0],
                    size: [1.0, 1.0],
                })]
            } else {
                Vec::new()
            };

            let mut next = state.clone();
            next.preview_screens.push(Screen {
                id: ids::supplied_or_new(device_id.as_deref()),
                kind: *kind,
                name: name.clone().unwrap_or_else(|| format!("{} {}", kind.label(), nth)),
                orientation: orientation.unwrap_or_else(|| kind.default_orientation()),
                regions,
                last_split: None,
            });
            Some(next)
        }
        Action::RemoveDevice { id } => {
            if state.screen(id).is_none() {
                debug!("REMOVE_DEVICE: unknown device {}", id);
                return None;
            }
            let mut next = state.clone();
            next.preview_screens.retain(|s| s.id != *id);
            if next.selected_screen.as_deref() == Some(id.as_str()) {
                next.selected_screen = None;
            }
            Some(next)
        }
        Action::UpdateSelectedScreen { screen_id } => {
            if let Some(id) = screen_id {
                if state.screen(id).is_none() {
                    debug!("UPDATE_SELECTED_SCREEN: unknown device {}", id);
                    return None;
                }
            }
            if state.selected_screen == *screen_id {
                return None;
            }
            Some(ScreenState { selected_screen: screen_id.clone(), ..state.clone() })
        }
        Action::SplitRegion { screen_id, region_id, orientation, position } => {
            state.edit_screen(screen_id, action, |screen| screen.split(region_id, *orientation, *position))
        }
        Action::MergeRegions { screen_id, region_id1, region_id2 } => {
            state.edit_screen(screen_id, action, |screen| screen.merge(region_id1, region_id2))
        }
        Action::UndoLastSplit { screen_id } => {
            state.edit_screen(screen_id, action, Screen::undo_last_split)
        }
        Action::PlaceRegionOnScreen { screen_id, position, size, region_id, name, color } => {
            state.edit_screen(screen_id, action, |screen| {
                screen.place_region(*position, *size, region_id.as_deref(), name.as_deref(), color.as_deref());
                true
            })
        }
        _ => None,
    }
}
