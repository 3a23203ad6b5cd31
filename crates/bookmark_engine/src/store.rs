//! Bookmark store backed by a Chromium `Bookmarks` JSON file.
//!
//! The file has a `roots` object whose values (`bookmark_bar`, `other`,
//! `synced`) are permanent folders. Nodes carry `id`, `name`, `type`
//! (`url` or `folder`), `url` for bookmarks and `children` for folders.
//! Fields this crate does not model (`guid`, dates, meta info) are kept
//! untouched when the file is rewritten.

use std::io;
use std::path::{Path, PathBuf};

use audit_logging::{audit_info, audit_warn};
use bookmark_core::BookmarkNode;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::persist::{write_atomically, PersistError};

/// Permanent roots in the order browsers display them.
const ROOT_ORDER: [&str; 3] = ["bookmark_bar", "other", "synced"];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read bookmarks file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bookmarks file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bookmarks file has no \"roots\" object")]
    MissingRoots,
    #[error("bookmark {0} not found")]
    NotFound(String),
    #[error("bookmark {0} is a permanent root folder")]
    PermanentNode(String),
    #[error("folder {0} is not empty")]
    FolderNotEmpty(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The authoritative bookmark collection.
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// The full forest, one folder per permanent root.
    async fn get_tree(&self) -> Result<Vec<BookmarkNode>, StoreError>;
    /// Deletes one bookmark or empty folder.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;
}

pub struct JsonBookmarkStore {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl JsonBookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl BookmarkStore for JsonBookmarkStore {
    async fn get_tree(&self) -> Result<Vec<BookmarkNode>, StoreError> {
        let path = self.path.clone();
        let tree = tokio::task::spawn_blocking(move || {
            let doc = read_document(&path)?;
            tree_from_document(&doc)
        })
        .await??;
        audit_info!("Loaded {} bookmark roots from {:?}", tree.len(), self.path);
        Ok(tree)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let owned_id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut doc = read_document(&path)?;
            remove_from_document(&mut doc, &owned_id)?;
            // Browsers recompute a missing checksum but distrust a stale one.
            if let Some(obj) = doc.as_object_mut() {
                obj.remove("checksum");
            }
            let content = serde_json::to_vec_pretty(&doc)?;
            write_atomically(&path, &content)?;
            Ok::<_, StoreError>(())
        })
        .await??;
        audit_info!("Removed bookmark {} from {:?}", id, self.path);
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<Value, StoreError> {
    let raw = std::fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&raw)?)
}

pub(crate) fn tree_from_document(doc: &Value) -> Result<Vec<BookmarkNode>, StoreError> {
    let roots = doc
        .get("roots")
        .and_then(Value::as_object)
        .ok_or(StoreError::MissingRoots)?;

    let mut keys: Vec<&String> = roots.keys().collect();
    keys.sort_by_key(|key| {
        ROOT_ORDER
            .iter()
            .position(|known| *known == key.as_str())
            .unwrap_or(ROOT_ORDER.len())
    });

    Ok(keys
        .into_iter()
        .filter_map(|key| parse_node(&roots[key]))
        .collect())
}

fn parse_node(value: &Value) -> Option<BookmarkNode> {
    let obj = value.as_object()?;
    let Some(id) = obj.get("id").and_then(Value::as_str) else {
        audit_warn!("Skipping bookmark entry without an id");
        return None;
    };
    let title = obj
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let is_folder = obj.get("type").and_then(Value::as_str) == Some("folder")
        || obj.contains_key("children");
    if is_folder {
        let children = obj
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().filter_map(parse_node).collect())
            .unwrap_or_default();
        Some(BookmarkNode {
            id: id.to_string(),
            title,
            url: None,
            children: Some(children),
        })
    } else {
        Some(BookmarkNode {
            id: id.to_string(),
            title,
            url: obj.get("url").and_then(Value::as_str).map(str::to_string),
            children: None,
        })
    }
}

fn node_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

pub(crate) fn remove_from_document(doc: &mut Value, id: &str) -> Result<(), StoreError> {
    let roots = doc
        .get_mut("roots")
        .and_then(Value::as_object_mut)
        .ok_or(StoreError::MissingRoots)?;
    if roots.values().any(|root| node_id(root) == Some(id)) {
        return Err(StoreError::PermanentNode(id.to_string()));
    }
    for root in roots.values_mut() {
        if remove_child(root, id)? {
            return Ok(());
        }
    }
    Err(StoreError::NotFound(id.to_string()))
}

fn remove_child(node: &mut Value, id: &str) -> Result<bool, StoreError> {
    let Some(children) = node.get_mut("children").and_then(Value::as_array_mut) else {
        return Ok(false);
    };
    if let Some(pos) = children.iter().position(|child| node_id(child) == Some(id)) {
        let non_empty = children[pos]
            .get("children")
            .and_then(Value::as_array)
            .is_some_and(|c| !c.is_empty());
        if non_empty {
            return Err(StoreError::FolderNotEmpty(id.to_string()));
        }
        children.remove(pos);
        return Ok(true);
    }
    for child in children.iter_mut() {
        if remove_child(child, id)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "checksum": "abc",
            "roots": {
                "synced": { "id": "3", "name": "Mobile", "type": "folder", "children": [] },
                "bookmark_bar": {
                    "id": "1", "name": "Bar", "type": "folder",
                    "children": [
                        { "id": "10", "name": "Rust", "type": "url", "url": "https://rust-lang.org" },
                        { "id": "11", "name": "Dir", "type": "folder", "children": [
                            { "id": "110", "name": "Docs", "type": "url", "url": "https://docs.rs" }
                        ]}
                    ]
                },
                "other": { "id": "2", "name": "Other", "type": "folder", "children": [] }
            },
            "version": 1
        })
    }

    #[test]
    fn roots_come_out_in_browser_order() {
        let tree = tree_from_document(&doc()).unwrap();
        let ids: Vec<_> = tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let bar = tree[0].children.as_ref().unwrap();
        assert_eq!(bar[0].url.as_deref(), Some("https://rust-lang.org"));
        assert!(bar[1].is_folder());
    }

    #[test]
    fn remove_enforces_browser_rules() {
        let mut doc = doc();
        assert!(matches!(
            remove_from_document(&mut doc, "1"),
            Err(StoreError::PermanentNode(_))
        ));
        assert!(matches!(
            remove_from_document(&mut doc, "11"),
            Err(StoreError::FolderNotEmpty(_))
        ));
        assert!(matches!(
            remove_from_document(&mut doc, "999"),
            Err(StoreError::NotFound(_))
        ));

        remove_from_document(&mut doc, "110").unwrap();
        remove_from_document(&mut doc, "11").unwrap();
        let tree = tree_from_document(&doc).unwrap();
        assert_eq!(tree[0].children.as_ref().unwrap().len(), 1);
    }
}
