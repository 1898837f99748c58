use crate::core::controller::Theme;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent, theme-aware style to a string.
pub fn style_text(text: &str, style_type: StyleType, theme: Theme) -> String {
    let styled = match (style_type, theme) {
        (StyleType::Title, Theme::Light) => style(text).bold().underlined(),
        (StyleType::Title, Theme::Dark) => style(text).cyan().bold().underlined(),
        (StyleType::Value, Theme::Light) => style(text).green().bold(),
        (StyleType::Value, Theme::Dark) => style(text).bright().yellow().bold(),
        (StyleType::Error, _) => style(text).red(),
        (StyleType::Subtle, Theme::Light) => style(text).dim(),
        (StyleType::Subtle, Theme::Dark) => style(text).white().dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Creates a right-aligned cell for a numeric rate.
pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Lays currency codes out in a grid, `columns` codes per row.
pub fn currency_grid(codes: &[String], columns: usize) -> Table {
    let mut table = new_styled_table();
    for row in codes.chunks(columns.max(1)) {
        table.add_row(row.iter().map(Cell::new));
    }
    table
}

/// Creates a new `indicatif::ProgressBar` spinner with standard styling.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
