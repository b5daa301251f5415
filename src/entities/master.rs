//! Master layouts: named layouts chapters can inherit from.
//!
//! Chapters hold master ids in their `master_layouts` set; removing a master
//! here is paired with the chapter reducer stripping it from every chapter.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::action::Action;
use crate::core::ids;

/// Asset pinned to a region of one device by a master layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPlacement {
    pub screen_id: String,
    pub region_id: String,
    pub component_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterLayout {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub placed_components: Vec<ComponentPlacement>,
}

impl MasterLayout {
    /// Placements this master makes on one device.
    pub fn placements_on(&self, screen_id: &str) -> Vec<&ComponentPlacement> {
        self.placed_components.iter().filter(|p| p.screen_id == screen_id).collect()
    }
}

pub fn reduce(masters: &[MasterLayout], action: &Action) -> Option<Vec<MasterLayout>> {
    match action {
        Action::AddMasterLayout { name, master_id } => {
            if let Some(id) = master_id {
                if masters.iter().any(|m| m.id == *id) {
                    debug!("ADD_MASTER_LAYOUT: master {} already exists", id);
                    return None;
                }
            }
            let mut next = masters.to_vec();
            next.push(MasterLayout {
                id: ids::supplied_or_new(master_id.as_deref()),
                name: name.clone(),
                placed_components: Vec::new(),
            });
            Some(next)
        }
        Action::RemoveMasterLayout { master_id } => {
            if !masters.iter().any(|m| m.id == *master_id) {
                debug!("REMOVE_MASTER_LAYOUT: unknown master {}", master_id);
                return None;
            }
            Some(masters.iter().filter(|m| m.id != *master_id).cloned().collect())
        }
        _ => None,
    }
}
