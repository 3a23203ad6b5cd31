use std::collections::HashSet;

use crate::tree::prune;
use crate::{find_by_id, traverse, BookmarkNode, ResultIndex};

/// Applies a completed deletion to the in-memory forest and result index.
///
/// Call this only with ids the bookmark store actually removed; the store
/// call itself is the caller's job and must happen first. A removed folder
/// takes its whole subtree with it, in the forest and in the index.
pub fn apply_deletion<S: AsRef<str>>(
    tree: &[BookmarkNode],
    index: &ResultIndex,
    ids: &[S],
) -> (Vec<BookmarkNode>, ResultIndex) {
    let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();

    let mut gone = ids.clone();
    for id in &ids {
        if let Some(folder) = find_by_id(tree, id).filter(|node| node.is_folder()) {
            traverse(folder, |leaf| {
                gone.insert(leaf.id.as_str());
            });
        }
    }

    let tree_after = prune(tree, &ids);
    let mut index = index.clone();
    index.remove_id_set(&gone);
    (tree_after, index)
}
