//! Collaborator traits for CarSearch.
//!
//! The orchestrator feeds data to the presentation layer through these
//! traits. Both are fire-and-forget: implementations must not block and
//! cannot report failure back.

use crate::models::CatalogRow;

/// Receives transient messages (retry attempts, bounded retries giving up).
pub trait Notifier: Send + Sync {
    /// Shows a message to the user.
    fn notify(&self, message: &str);
}

/// Receives the merged rows of each successful search.
///
/// Pagination and rendering belong to the implementor.
pub trait ResultsDisplay: Send + Sync {
    /// Shows a fresh result set, replacing any previous one.
    fn show(&self, rows: &[CatalogRow]);
}

/// A notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
}
