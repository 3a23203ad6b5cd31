use std::collections::{HashMap, HashSet};

use crate::BookmarkNode;

/// Insertion-ordered mapping from classification key to the nodes in that
/// class.
///
/// Groups keep discovery order and the key order is first-seen order. No key
/// ever maps to an empty group. Cloning produces an independent snapshot.
///
/// `min_group_size` is the smallest group that still means something: 1 for
/// dead-link buckets, 2 for duplicate groups. Removals drop any group that
/// falls below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultIndex {
    groups: Vec<ResultGroup>,
    positions: HashMap<String, usize>,
    min_group_size: usize,
}

impl Default for ResultIndex {
    fn default() -> Self {
        Self::with_min_group_size(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    pub key: String,
    pub nodes: Vec<BookmarkNode>,
}

impl ResultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_group_size(min_group_size: usize) -> Self {
        Self {
            groups: Vec::new(),
            positions: HashMap::new(),
            min_group_size: min_group_size.max(1),
        }
    }

    pub fn min_group_size(&self) -> usize {
        self.min_group_size
    }

    /// Appends `node` to the group for `key`, creating the group if needed.
    pub fn push(&mut self, key: impl Into<String>, node: BookmarkNode) {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&pos) => self.groups[pos].nodes.push(node),
            None => {
                self.positions.insert(key.clone(), self.groups.len());
                self.groups.push(ResultGroup {
                    key,
                    nodes: vec![node],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[BookmarkNode]> {
        self.positions
            .get(key)
            .map(|&pos| self.groups[pos].nodes.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of nodes across all groups.
    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|g| g.nodes.len()).sum()
    }

    /// Drops every group smaller than the minimum group size.
    pub fn prune_small_groups(&mut self) {
        let min = self.min_group_size;
        self.groups.retain(|g| g.nodes.len() >= min);
        self.reindex();
    }

    /// Removes nodes whose id is in `ids` from every group; groups that end
    /// up below the minimum size are dropped entirely.
    pub fn remove_ids<S: AsRef<str>>(&mut self, ids: &[S]) {
        let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        self.remove_id_set(&ids);
    }

    pub(crate) fn remove_id_set(&mut self, ids: &HashSet<&str>) {
        if ids.is_empty() {
            return;
        }
        for group in &mut self.groups {
            group.nodes.retain(|node| !ids.contains(node.id.as_str()));
        }
        self.prune_small_groups();
    }

    fn reindex(&mut self) {
        self.positions = self
            .groups
            .iter()
            .enumerate()
            .map(|(pos, g)| (g.key.clone(), pos))
            .collect();
    }
}

impl<'a> IntoIterator for &'a ResultIndex {
    type Item = &'a ResultGroup;
    type IntoIter = std::slice::Iter<'a, ResultGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> BookmarkNode {
        BookmarkNode::leaf(id, id, format!("http://{id}"))
    }

    #[test]
    fn keys_keep_first_seen_order() {
        let mut index = ResultIndex::new();
        index.push("b", leaf("1"));
        index.push("a", leaf("2"));
        index.push("b", leaf("3"));

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        let b: Vec<_> = index.get("b").unwrap().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(b, vec!["1", "3"]);
        assert_eq!(index.node_count(), 3);
    }

    #[test]
    fn removing_last_member_drops_the_key() {
        let mut index = ResultIndex::new();
        index.push("404", leaf("1"));
        index.push("500", leaf("2"));
        index.push("500", leaf("3"));

        index.remove_ids(&["1", "3"]);

        assert!(!index.contains_key("404"));
        assert_eq!(index.get("500").unwrap().len(), 1);
        // Lookups still work after the positions were rebuilt.
        index.push("500", leaf("4"));
        assert_eq!(index.get("500").unwrap().len(), 2);
    }

    #[test]
    fn duplicate_groups_collapse_below_two() {
        let mut index = ResultIndex::with_min_group_size(2);
        index.push("http://x", leaf("a"));
        index.push("http://x", leaf("b"));
        index.push("http://y", leaf("c"));
        index.prune_small_groups();
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["http://x"]);

        index.remove_ids(&["a"]);
        assert!(index.is_empty());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut index = ResultIndex::new();
        index.push("k", leaf("1"));
        let snapshot = index.clone();
        index.push("k", leaf("2"));
        assert_eq!(snapshot.get("k").unwrap().len(), 1);
    }
}
