//! Media assets referenced by timeline elements.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::action::Action;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub preview_url: String,
    /// Natural length in seconds.
    pub duration: f64,
}

pub fn reduce(assets: &[Asset], action: &Action) -> Option<Vec<Asset>> {
    match action {
        Action::AddAsset { id, name, description, preview_url, duration } => {
            let asset = Asset {
                id: id.clone(),
                name: name.clone(),
                description: description.clone(),
                preview_url: preview_url.clone(),
                duration: *duration,
            };
            let mut next = assets.to_vec();
            match next.iter_mut().find(|a| a.id == *id) {
                Some(existing) if *existing == asset => return None,
                Some(existing) => *existing = asset,
                None => next.push(asset),
            }
            Some(next)
        }
        Action::RemoveAsset { id } => {
            if !assets.iter().any(|a| a.id == *id) {
                debug!("REMOVE_ASSET: unknown asset {}", id);
                return None;
            }
            Some(assets.iter().filter(|a| a.id != *id).cloned().collect())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(id: &str, name: &str) -> Action {
        Action::AddAsset {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            preview_url: format!("https://cdn/{id}.jpg"),
            duration: 8.0,
        }
    }

    #[test]
    fn test_readding_replaces() {
        let assets = reduce(&[], &add("a", "Clip")).unwrap();
        let assets = reduce(&assets, &add("a", "Renamed")).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "Renamed");

        // Identical payload changes nothing.
        assert!(reduce(&assets, &add("a", "Renamed")).is_none());
    }

    #[test]
    fn test_remove() {
        let assets = reduce(&[], &add("a", "Clip")).unwrap();
        assert!(reduce(&assets, &Action::RemoveAsset { id: "b".into() }).is_none());
        let assets = reduce(&assets, &Action::RemoveAsset { id: "a".into() }).unwrap();
        assert!(assets.is_empty());
    }
}
