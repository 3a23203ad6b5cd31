pub type NodeId = String;

/// One entry of the bookmark forest.
///
/// A node is a folder iff `children` is `Some` (possibly empty) and a leaf
/// otherwise. Only leaves carry a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkNode {
    pub id: NodeId,
    pub title: String,
    pub url: Option<String>,
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            children: None,
        }
    }

    pub fn folder(
        id: impl Into<String>,
        title: impl Into<String>,
        children: Vec<BookmarkNode>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            children: Some(children),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// URL of a leaf, `None` for folders and for leaves with an empty URL.
    pub fn probe_url(&self) -> Option<&str> {
        match (&self.children, self.url.as_deref()) {
            (None, Some(url)) if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}
