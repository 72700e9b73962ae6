//! Text output formatting with colors.

use carsearch_core::{CatalogRow, VehicleMake, VehicleType};

use super::page::Pagination;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const MAKE_COLUMN: usize = 24;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the vehicle-type list.
    pub fn format_vehicle_types(&self, types: &[VehicleType]) -> String {
        let mut lines = vec![self.bold("Vehicle types")];
        lines.push("─".repeat(40));
        lines.extend(types.iter().map(|vt| format!("  {}", vt.name)));
        lines.push(String::new());
        lines.push(format!("Total: {} types", types.len()));
        lines.join("\n")
    }

    /// Formats the make list of a vehicle type.
    pub fn format_makes(&self, vehicle_type: &VehicleType, makes: &[VehicleMake]) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.bold("Makes for"),
            self.cyan(&vehicle_type.name)
        )];
        lines.push("─".repeat(40));
        lines.extend(makes.iter().map(|m| format!("{:>8}  {}", m.id, m.name)));
        lines.push(String::new());
        lines.push(format!("Total: {} makes", makes.len()));
        lines.join("\n")
    }

    /// Formats one page of search results with a range footer.
    pub fn format_results(&self, rows: &[CatalogRow], pagination: Pagination) -> String {
        let mut lines = vec![self.bold(&format!("{:<MAKE_COLUMN$} {}", "Make", "Model"))];
        lines.push("─".repeat(MAKE_COLUMN + 30));

        let page = pagination.slice(rows);
        if rows.is_empty() {
            lines.push(self.dim("No models found"));
        } else if page.is_empty() {
            lines.push(self.dim("No rows on this page"));
        }
        lines.extend(
            page.iter()
                .map(|row| format!("{:<MAKE_COLUMN$} {}", row.make_name, row.model_name)),
        );

        lines.push(String::new());
        let mut footer = pagination.range_label(rows.len());
        let pages = pagination.page_count(rows.len());
        if pages > 1 {
            footer.push_str(&format!("  (page {} of {})", pagination.page + 1, pages));
        }
        lines.push(self.dim(&footer));
        lines.join("\n")
    }

    /// Formats a retry notice.
    pub fn format_notice(&self, message: &str) -> String {
        self.yellow(&format!("⟳ {message}"))
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
