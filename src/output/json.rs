use serde_json::{Value, json};

use crate::tracking::RenderedView;

/// Machine-readable tracking result. `found` mirrors the process exit code.
pub(crate) fn output_tracking_json(view: &RenderedView) -> String {
    let steps: Vec<Value> = view
        .steps
        .iter()
        .zip(&view.details)
        .map(|(step, detail)| {
            json!({
                "label": step.label,
                "state": step.state,
                "detail": detail.text,
            })
        })
        .collect();

    let mut output = json!({
        "orderName": view.order_name,
        "found": view.step_index.is_some(),
        "status": view.status_text,
        "tone": view.tone,
        "stepIndex": view.step_index,
        "progressPercent": view.progress_percent,
        "steps": steps,
        "trackingCode": view.tracking_code,
        "shareUrl": view.share_url,
    });
    if view.step_index.is_none() {
        output["message"] = view
            .details
            .first()
            .map(|d| Value::String(d.text.clone()))
            .unwrap_or(Value::Null);
    }

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}
