use comfy_table::{
    Attribute, Cell, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::tracking::{StepState, Tone};

const BAR_WIDTH: usize = 20;

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn step_marker(state: StepState) -> &'static str {
    match state {
        StepState::Completed => "✓",
        StepState::Active => "●",
        StepState::Pending => "○",
    }
}

pub(super) fn step_color(state: StepState, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    match state {
        StepState::Completed => Some(Color::Green),
        StepState::Active => Some(Color::Cyan),
        StepState::Pending => Some(Color::DarkGrey),
    }
}

pub(super) fn tone_color(tone: Tone, use_color: bool) -> Option<Color> {
    match (tone, use_color) {
        (Tone::Alert, true) => Some(Color::Red),
        _ => None,
    }
}

/// Fixed-width text bar, e.g. `[##########----------]  50%`
pub(super) fn progress_bar(percent: f64) -> String {
    let clamped = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        clamped
    )
}
