use std::collections::HashSet;

use crate::BookmarkNode;

/// A folder offered for scoping a check, flattened out of the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub id: String,
    pub title: String,
    pub depth: usize,
}

/// Returns a new forest without any node whose id is in `ids`, at any depth.
///
/// Folders emptied by the removal stay folders. Surviving siblings keep their
/// order and unknown ids are ignored.
pub fn remove_by_ids<S: AsRef<str>>(forest: &[BookmarkNode], ids: &[S]) -> Vec<BookmarkNode> {
    let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    prune(forest, &ids)
}

pub(crate) fn prune(forest: &[BookmarkNode], ids: &HashSet<&str>) -> Vec<BookmarkNode> {
    forest
        .iter()
        .filter(|node| !ids.contains(node.id.as_str()))
        .map(|node| BookmarkNode {
            id: node.id.clone(),
            title: node.title.clone(),
            url: node.url.clone(),
            children: node.children.as_deref().map(|children| prune(children, ids)),
        })
        .collect()
}

pub fn find_by_id<'a>(forest: &'a [BookmarkNode], id: &str) -> Option<&'a BookmarkNode> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_by_id(c, id)) {
            return Some(found);
        }
    }
    None
}

/// Every folder of the forest in document order, with its nesting depth.
pub fn collect_folders(forest: &[BookmarkNode]) -> Vec<FolderEntry> {
    let mut out = Vec::new();
    collect_folders_into(forest, 0, &mut out);
    out
}

fn collect_folders_into(forest: &[BookmarkNode], depth: usize, out: &mut Vec<FolderEntry>) {
    for node in forest {
        if let Some(children) = &node.children {
            out.push(FolderEntry {
                id: node.id.clone(),
                title: node.title.clone(),
                depth,
            });
            collect_folders_into(children, depth + 1, out);
        }
    }
}

/// Resolves the nodes a check should run over.
///
/// An empty selection means the whole forest. Selected ids that no longer
/// exist are skipped, so a stale selection can yield an empty root set.
/// Repeated ids and folders nested inside another selected folder are
/// dropped, so every leaf appears under at most one root. Roots keep
/// first-selection order.
pub fn select_roots(forest: &[BookmarkNode], folder_ids: &[String]) -> Vec<BookmarkNode> {
    if folder_ids.is_empty() {
        return forest.to_vec();
    }
    let mut seen = HashSet::new();
    let selected: Vec<&BookmarkNode> = folder_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| find_by_id(forest, id))
        .collect();
    selected
        .iter()
        .filter(|node| {
            !selected
                .iter()
                .any(|other| other.id != node.id && is_descendant(other, &node.id))
        })
        .map(|node| (*node).clone())
        .collect()
}

fn is_descendant(ancestor: &BookmarkNode, id: &str) -> bool {
    ancestor
        .children
        .as_deref()
        .is_some_and(|children| find_by_id(children, id).is_some())
}
