//! Core domain types for the notification pipeline.

pub mod changes;
pub mod ids;
pub mod message;

pub use changes::{ChangeKind, CommitFiles, FileChangeSet};
pub use ids::{CommitId, DeliveryId, RepoName};
pub use message::{EventKind, NotificationMessage};
