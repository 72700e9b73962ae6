//! Terminal collaborators for the search store.

use carsearch_core::{CatalogRow, Notifier, ResultsDisplay};
use tracing::warn;

use super::page::Pagination;
use super::{JsonFormatter, TextFormatter};
use crate::OutputFormat;

/// Prints retry notices to stderr as `⟳ message`.
pub struct StderrNotifier {
    formatter: TextFormatter,
}

impl StderrNotifier {
    pub fn new(use_colors: bool) -> Self {
        Self {
            formatter: TextFormatter::new(use_colors),
        }
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", self.formatter.format_notice(message));
    }
}

/// Prints one page of each published result set to stdout.
pub struct PageDisplay {
    format: OutputFormat,
    text: TextFormatter,
    json: JsonFormatter,
    pagination: Pagination,
}

impl PageDisplay {
    pub fn new(format: OutputFormat, use_colors: bool, pretty: bool, pagination: Pagination) -> Self {
        Self {
            format,
            text: TextFormatter::new(use_colors),
            json: JsonFormatter::new(pretty),
            pagination,
        }
    }

    /// Renders `rows` without printing.
    pub fn render(&self, rows: &[CatalogRow]) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.text.format_results(rows, self.pagination)),
            OutputFormat::Json => self.json.format_results(rows, self.pagination),
        }
    }
}

impl ResultsDisplay for PageDisplay {
    fn show(&self, rows: &[CatalogRow]) {
        match self.render(rows) {
            Ok(output) => println!("{output}"),
            Err(e) => warn!(error = %e, "Failed to render results"),
        }
    }
}
