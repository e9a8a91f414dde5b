use comfy_table::{Cell, Color, Table};

use crate::output::format::{
    create_styled_table, header_cell, progress_bar, step_color, step_marker, styled_cell,
    tone_color,
};
use crate::tracking::{RenderedView, StepState};

fn timeline_table(view: &RenderedView, use_color: bool) -> Table {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("", use_color),
        header_cell("Step", use_color),
        header_cell("Details", use_color),
    ]);
    for (step, detail) in view.steps.iter().zip(&view.details) {
        let color = step_color(step.state, use_color);
        table.add_row(vec![
            styled_cell(step_marker(step.state), color, false),
            styled_cell(step.label, color, step.state == StepState::Active),
            Cell::new(&detail.text),
        ]);
    }
    table
}

fn problem_table(view: &RenderedView, use_color: bool) -> Table {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Order", use_color),
        header_cell("Details", use_color),
    ]);
    for detail in &view.details {
        table.add_row(vec![
            styled_cell(detail.title, tone_color(view.tone, use_color), true),
            Cell::new(&detail.text),
        ]);
    }
    table
}

fn build_table(view: &RenderedView, use_color: bool) -> Table {
    match view.step_index {
        Some(_) => timeline_table(view, use_color),
        None => problem_table(view, use_color),
    }
}

fn status_line(view: &RenderedView, use_color: bool) -> String {
    if !use_color {
        return view.status_text.clone();
    }
    let code = match tone_color(view.tone, use_color) {
        Some(Color::Red) => "31",
        _ => "32",
    };
    format!("\x1b[{code}m{}\x1b[0m", view.status_text)
}

/// Print the tracking timeline for one order
pub(crate) fn print_tracking_table(view: &RenderedView, use_color: bool) {
    println!("\n  Order {}: {}\n", view.order_name, status_line(view, use_color));
    println!("{}", build_table(view, use_color));
    println!("\n  {}", progress_bar(view.progress_percent));
    if let Some(code) = &view.tracking_code {
        println!("  Tracking number: {code}");
    }
    if let Some(url) = &view.share_url {
        println!("  Share: {url}");
    }
    println!();
}
