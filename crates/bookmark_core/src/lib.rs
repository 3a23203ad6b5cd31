//! Bookmark core: tree model, traversal, duplicate grouping, result index,
//! reconciliation and the pure audit state machine.
mod duplicates;
mod effect;
mod index;
mod msg;
mod node;
mod reconcile;
mod settings;
mod state;
mod traverse;
mod tree;
mod update;
mod view_model;

pub use duplicates::{find_duplicates, DuplicateKeyMode, UNPARSEABLE_URL_KEY};
pub use effect::Effect;
pub use index::{ResultGroup, ResultIndex};
pub use msg::{DeleteFailure, Msg};
pub use node::{BookmarkNode, NodeId};
pub use reconcile::apply_deletion;
pub use settings::{
    AuditSettings, DEFAULT_MAX_REQUESTS, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_REQUESTS_RANGE,
    REQUEST_TIMEOUT_RANGE_SECS,
};
pub use state::{ActionType, AuditState, JobProgress};
pub use traverse::{count_leaves, leaves, traverse, Leaves};
pub use tree::{collect_folders, find_by_id, remove_by_ids, select_roots, FolderEntry};
pub use update::update;
pub use view_model::{AuditViewModel, ResultGroupView};
