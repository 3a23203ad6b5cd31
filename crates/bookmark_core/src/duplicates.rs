use audit_logging::{audit_debug, audit_warn};
use url::Url;

use crate::traverse::traverse;
use crate::{BookmarkNode, ResultIndex};

/// Key under which domain-mode grouping files leaves whose URL has no
/// parseable hostname.
pub const UNPARSEABLE_URL_KEY: &str = "Unparseable URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyMode {
    /// Two bookmarks are duplicates when their URL strings are identical.
    #[default]
    ByUrl,
    /// Two bookmarks are duplicates when they point at the same hostname.
    ByDomain,
}

impl DuplicateKeyMode {
    pub fn from_use_domain(use_domain: bool) -> Self {
        if use_domain {
            Self::ByDomain
        } else {
            Self::ByUrl
        }
    }

    /// Grouping key for one URL. Never fails: malformed URLs map to
    /// [`UNPARSEABLE_URL_KEY`] in domain mode.
    pub fn key_for(self, url: &str) -> String {
        match self {
            Self::ByUrl => url.to_string(),
            Self::ByDomain => match Url::parse(url) {
                Ok(parsed) => match parsed.host_str() {
                    Some(host) => host.to_string(),
                    None => {
                        audit_warn!("Bookmark URL has no hostname: {}", url);
                        UNPARSEABLE_URL_KEY.to_string()
                    }
                },
                Err(err) => {
                    audit_warn!("Cannot extract hostname from {}: {}", url, err);
                    UNPARSEABLE_URL_KEY.to_string()
                }
            },
        }
    }
}

/// Groups the leaves under `roots` by `mode` and keeps groups with at least
/// two members, in first-seen order.
pub fn find_duplicates(roots: &[BookmarkNode], mode: DuplicateKeyMode) -> ResultIndex {
    let mut index = ResultIndex::with_min_group_size(2);
    for root in roots {
        traverse(root, |leaf| {
            if let Some(url) = leaf.probe_url() {
                index.push(mode.key_for(url), leaf.clone());
            }
        });
    }
    index.prune_small_groups();
    audit_debug!(
        "Duplicate scan ({:?}) found {} groups covering {} bookmarks",
        mode,
        index.len(),
        index.node_count()
    );
    index
}
