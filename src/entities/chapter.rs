//! Chapter tree: the hierarchical outline of a presentation.
//!
//! Chapters are addressed positionally through [`access_path`](super::access_path).
//! The reducer is pure: it reads the previous tree and returns a new one, or
//! `None` when the action does not concern chapters or cannot be applied.

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::access_path::{self, AccessPath, Nested};
use crate::core::action::Action;
use crate::core::ids;
use crate::core::payload::ChapterTree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Chapter>,
    /// Ids of master layouts applied to this chapter.
    #[serde(default)]
    pub master_layouts: BTreeSet<String>,
}

impl Chapter {
    /// Fresh, unnamed chapter.
    pub fn new() -> Self {
        Self::with_id(ids::generate(), "")
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            master_layouts: BTreeSet::new(),
        }
    }

    /// Number of chapters in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Chapter::subtree_len).sum::<usize>()
    }
}

impl Default for Chapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Nested for Chapter {
    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl From<&ChapterTree> for Chapter {
    fn from(tree: &ChapterTree) -> Self {
        Self {
            id: tree.id.clone(),
            name: tree.name.clone(),
            children: tree.chapters.iter().map(Chapter::from).collect(),
            master_layouts: BTreeSet::new(),
        }
    }
}

/// Path of the chapter with `id`, recomputed from `chapters`.
pub fn path_of(chapters: &[Chapter], id: &str) -> Option<AccessPath> {
    access_path::find_path(chapters, |c| c.id == id)
}

/// Chapter reducer. Returns the new top-level list, or `None` if unchanged.
pub fn reduce(chapters: &[Chapter], action: &Action) -> Option<Vec<Chapter>> {
    match action {
        Action::AddChapterBefore { access_path } => {
            edit(chapters, action, |tree| access_path::insert_before(tree, access_path, Chapter::new()))
        }
        Action::AddChapterAfter { access_path } => {
            edit(chapters, action, |tree| access_path::insert_after(tree, access_path, Chapter::new()))
        }
        Action::AddChapterChild { access_path } => {
            edit(chapters, action, |tree| access_path::insert_child(tree, access_path, Chapter::new()))
        }
        Action::RemoveChapter { access_path } => {
            edit(chapters, action, |tree| access_path::remove(tree, access_path).is_some())
        }
        Action::RenameChapter { access_path, name } => edit(chapters, action, |tree| {
            match access_path::resolve_mut(tree, access_path) {
                Some(chapter) => {
                    chapter.name = name.clone();
                    true
                }
                None => false,
            }
        }),
        Action::AssignMasterLayout { access_path, master_id } => edit(chapters, action, |tree| {
            access_path::resolve_mut(tree, access_path)
                .map(|chapter| chapter.master_layouts.insert(master_id.clone()))
                .unwrap_or(false)
        }),
        Action::UnassignMasterLayout { access_path, master_id } => edit(chapters, action, |tree| {
            access_path::resolve_mut(tree, access_path)
                .map(|chapter| chapter.master_layouts.remove(master_id))
                .unwrap_or(false)
        }),
        Action::RemoveMasterLayout { master_id } => {
            let mut used = false;
            access_path::walk(chapters, |_, c| used |= c.master_layouts.contains(master_id));
            if !used {
                return None;
            }
            let mut tree = chapters.to_vec();
            strip_master(&mut tree, master_id);
            Some(tree)
        }
        Action::LoadChapterTree { tree } => {
            let mut root = Chapter::from(tree);
            keep_masters(&mut root, chapters);
            if chapters.len() == 1 && chapters[0] == root {
                debug!("LOAD_CHAPTER_TREE: tree {} already loaded", root.id);
                return None;
            }
            Some(vec![root])
        }
        _ => None,
    }
}

// Apply `op` to a copy of the tree; keep the copy only if `op` reports a change.
fn edit(chapters: &[Chapter], action: &Action, op: impl FnOnce(&mut Vec<Chapter>) -> bool) -> Option<Vec<Chapter>> {
    let mut tree = chapters.to_vec();
    if op(&mut tree) {
        Some(tree)
    } else {
        debug!("{}: access path did not resolve, chapter tree unchanged", action.kind());
        None
    }
}

// Chapters that survive a reload by id keep their master assignments.
fn keep_masters(chapter: &mut Chapter, previous: &[Chapter]) {
    if let Some(old) = access_path::find_path(previous, |c| c.id == chapter.id)
        .and_then(|path| access_path::resolve(previous, &path))
    {
        chapter.master_layouts = old.master_layouts.clone();
    }
    for child in &mut chapter.children {
        keep_masters(child, previous);
    }
}

fn strip_master(list: &mut [Chapter], master_id: &str) {
    for chapter in list {
        chapter.master_layouts.remove(master_id);
        strip_master(&mut chapter.children, master_id);
    }
}
