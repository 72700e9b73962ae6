//! Output formatting for CLI.

mod json;
mod page;
mod sink;
mod text;

pub use json::JsonFormatter;
pub use page::{Pagination, DEFAULT_PER_PAGE};
pub use sink::{PageDisplay, StderrNotifier};
pub use text::TextFormatter;
