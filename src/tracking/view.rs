//! View state and the single render step
//!
//! [`render`] turns a [`ViewState`] into everything a front end displays.
//! It is pure: the same view and options always give the same output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::timeline::{StepState, TimelineState, TimelineStep, classify_steps, progress_fraction};
use crate::utils::{Timezone, format_display_date, share_url};
use crate::utils::date::format_instant;
use crate::wms::{Order, UpstreamDate};

/// Result of one tracking lookup
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Found { order: Order, state: TimelineState },
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub(crate) struct ViewState {
    pub(crate) order_name: String,
    pub(crate) outcome: Outcome,
}

impl ViewState {
    pub(crate) fn is_found(&self) -> bool {
        matches!(self.outcome, Outcome::Found { .. })
    }
}

pub(crate) struct RenderOptions<'a> {
    pub(crate) timezone: Timezone,
    pub(crate) share_base_url: Option<&'a str>,
    /// Stands in for dispatch/delivery dates the WMS has not filled yet
    pub(crate) now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Tone {
    Normal,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StepView {
    pub(crate) label: &'static str,
    pub(crate) state: StepState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DetailLine {
    pub(crate) title: &'static str,
    pub(crate) done: bool,
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RenderedView {
    pub(crate) order_name: String,
    pub(crate) status_text: String,
    pub(crate) tone: Tone,
    pub(crate) step_index: Option<usize>,
    pub(crate) steps: Vec<StepView>,
    pub(crate) progress_percent: f64,
    pub(crate) details: Vec<DetailLine>,
    pub(crate) tracking_code: Option<String>,
    pub(crate) share_url: Option<String>,
}

pub(crate) fn render(view: &ViewState, opts: &RenderOptions<'_>) -> RenderedView {
    match &view.outcome {
        Outcome::Found { order, state } => render_found(&view.order_name, order, *state, opts),
        Outcome::NotFound => render_problem(
            &view.order_name,
            "Order not found",
            DetailLine {
                title: "Order Not Found",
                done: false,
                text: format!(
                    "We couldn't find an order with the number \"{}\". Please check the order number and try again.",
                    view.order_name
                ),
            },
        ),
        Outcome::Failed { message } => render_problem(
            &view.order_name,
            "Error: Could not retrieve tracking information",
            DetailLine {
                title: "Error",
                done: false,
                text: if message.is_empty() {
                    "Please check your input and try again.".to_string()
                } else {
                    message.clone()
                },
            },
        ),
    }
}

fn pending_steps() -> Vec<StepView> {
    TimelineStep::ALL
        .iter()
        .map(|step| StepView {
            label: step.label(),
            state: StepState::Pending,
        })
        .collect()
}

fn render_problem(order_name: &str, status_text: &str, detail: DetailLine) -> RenderedView {
    RenderedView {
        order_name: order_name.to_string(),
        status_text: status_text.to_string(),
        tone: Tone::Alert,
        step_index: None,
        steps: pending_steps(),
        progress_percent: 0.0,
        details: vec![detail],
        tracking_code: None,
        share_url: None,
    }
}

fn render_found(
    order_name: &str,
    order: &Order,
    state: TimelineState,
    opts: &RenderOptions<'_>,
) -> RenderedView {
    let current = state.index();
    let total = TimelineStep::ALL.len();
    let steps = TimelineStep::ALL
        .iter()
        .zip(classify_steps(current, total))
        .map(|(step, state)| StepView {
            label: step.label(),
            state,
        })
        .collect();

    RenderedView {
        order_name: order_name.to_string(),
        status_text: state.step.label().to_string(),
        tone: Tone::Normal,
        step_index: Some(current),
        steps,
        progress_percent: progress_fraction(current, total) * 100.0,
        details: detail_lines(order, current, opts),
        tracking_code: order.tracking_code().map(str::to_string),
        share_url: opts
            .share_base_url
            .map(|base| share_url(base, order_name)),
    }
}

fn detail_lines(order: &Order, current: usize, opts: &RenderOptions<'_>) -> Vec<DetailLine> {
    let tz = opts.timezone;
    let reached = |step: TimelineStep| current >= step.index();
    let date_or_now = |date: Option<&UpstreamDate>| match date {
        Some(_) => format_display_date(date, tz),
        None => format_instant(opts.now, tz),
    };

    let processing = if reached(TimelineStep::Processing) {
        "Your order is being prepared for packing.".to_string()
    } else {
        "Waiting for processing to begin.".to_string()
    };
    let packing = if reached(TimelineStep::Packing) {
        "Your items have been packed and are ready for shipping.".to_string()
    } else {
        "Waiting for packing to begin.".to_string()
    };
    let shipped = if reached(TimelineStep::Shipped) {
        let tracking = order
            .tracking_code()
            .map(|code| format!(" with tracking number: {code}"))
            .unwrap_or_default();
        format!(
            "Your order was shipped on {}{tracking}.",
            date_or_now(order.dispatched_date.as_ref())
        )
    } else {
        "Waiting for shipment.".to_string()
    };
    let delivered = if reached(TimelineStep::Delivered) {
        format!(
            "Your order was delivered on {}.",
            date_or_now(order.delivered_date.as_ref())
        )
    } else {
        "Waiting for delivery.".to_string()
    };

    let received = format!(
        "Your order #{} was received on {}.",
        order.document_no,
        format_display_date(order.created_date.as_ref(), tz)
    );

    [received, processing, packing, shipped, delivered]
        .into_iter()
        .zip(TimelineStep::ALL)
        .map(|(text, step)| DetailLine {
            title: step.label(),
            done: reached(step),
            text,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_support::order;

    fn opts(share: Option<&str>) -> RenderOptions<'_> {
        RenderOptions {
            timezone: Timezone::Named(chrono_tz::UTC),
            share_base_url: share,
            now: "2026-10-18T12:00:00Z".parse().unwrap(),
        }
    }

    fn found(status: &str) -> ViewState {
        ViewState {
            order_name: "TMR-O12345".to_string(),
            outcome: Outcome::Found {
                order: order("TMR-O12345", status),
                state: TimelineState::from_status(status),
            },
        }
    }

    #[test]
    fn packed_order_renders_packing_at_half() {
        let r = render(&found("PACKED"), &opts(None));
        assert_eq!(r.status_text, "Packing");
        assert_eq!(r.step_index, Some(2));
        assert_eq!(r.progress_percent, 50.0);
        assert_eq!(r.tone, Tone::Normal);
        let states: Vec<_> = r.steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            [
                StepState::Completed,
                StepState::Completed,
                StepState::Active,
                StepState::Pending,
                StepState::Pending
            ]
        );
        assert_eq!(r.details[2].text, "Your items have been packed and are ready for shipping.");
        assert_eq!(r.details[3].text, "Waiting for shipment.");
        assert!(r.details[2].done);
        assert!(!r.details[3].done);
    }

    #[test]
    fn progress_endpoints() {
        assert_eq!(render(&found("CREATED"), &opts(None)).progress_percent, 0.0);
        assert_eq!(render(&found("DELIVERED"), &opts(None)).progress_percent, 100.0);
    }

    #[test]
    fn shipped_detail_mentions_tracking_code_and_date() {
        let mut o = order("TMR-O7", "DISPATCHED");
        o.tracking_code = Some("JNT123".to_string());
        o.dispatched_date = Some(UpstreamDate::Text("2026-10-17T08:15:00Z".to_string()));
        let view = ViewState {
            order_name: "TMR-O7".to_string(),
            outcome: Outcome::Found {
                state: TimelineState::from_status(&o.status),
                order: o,
            },
        };
        let r = render(&view, &opts(None));
        assert_eq!(
            r.details[3].text,
            "Your order was shipped on October 17, 2026, 08:15 AM with tracking number: JNT123."
        );
        assert_eq!(r.tracking_code.as_deref(), Some("JNT123"));
    }

    #[test]
    fn missing_delivery_date_falls_back_to_now() {
        let r = render(&found("DELIVERED"), &opts(None));
        assert_eq!(
            r.details[4].text,
            "Your order was delivered on October 18, 2026, 12:00 PM."
        );
    }

    #[test]
    fn received_line_uses_created_date() {
        let r = render(&found("CREATED"), &opts(None));
        assert_eq!(r.details[0].text, "Your order #TMR-O12345 was received on Unknown Date.");
        assert!(r.details[0].done);
        assert!(!r.details[1].done);
    }

    #[test]
    fn share_link_only_when_found() {
        let base = Some("https://shop.example/track");
        let ok = render(&found("PACKED"), &opts(base));
        assert_eq!(
            ok.share_url.as_deref(),
            Some("https://shop.example/track?tracking=TMR-O12345")
        );

        let missing = ViewState {
            order_name: "TMR-O1".to_string(),
            outcome: Outcome::NotFound,
        };
        assert_eq!(render(&missing, &opts(base)).share_url, None);
    }

    #[test]
    fn not_found_view() {
        let view = ViewState {
            order_name: "TMR-O404".to_string(),
            outcome: Outcome::NotFound,
        };
        let r = render(&view, &opts(None));
        assert_eq!(r.status_text, "Order not found");
        assert_eq!(r.tone, Tone::Alert);
        assert_eq!(r.step_index, None);
        assert!(r.steps.iter().all(|s| s.state == StepState::Pending));
        assert!(r.details[0].text.contains("\"TMR-O404\""));
    }

    #[test]
    fn failed_view_carries_message() {
        let view = ViewState {
            order_name: "TMR-O1".to_string(),
            outcome: Outcome::Failed {
                message: "Login failed with status: 500".to_string(),
            },
        };
        let r = render(&view, &opts(Some("https://shop.example")));
        assert_eq!(r.status_text, "Error: Could not retrieve tracking information");
        assert_eq!(r.details[0].title, "Error");
        assert_eq!(r.details[0].text, "Login failed with status: 500");
        assert_eq!(r.share_url, None);
    }

    #[test]
    fn render_is_idempotent() {
        let view = found("MANIFESTED");
        assert_eq!(render(&view, &opts(None)), render(&view, &opts(None)));
    }
}
