//! Mapping of WMS order states onto the customer-facing fulfillment timeline
//!
//! Everything here is pure: the same status always yields the same step.

use serde::Serialize;

/// One of the five fixed fulfillment stages shown to customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TimelineStep {
    OrderReceived,
    Processing,
    Packing,
    Shipped,
    Delivered,
}

impl TimelineStep {
    /// All steps in display order
    pub(crate) const ALL: [TimelineStep; 5] = [
        TimelineStep::OrderReceived,
        TimelineStep::Processing,
        TimelineStep::Packing,
        TimelineStep::Shipped,
        TimelineStep::Delivered,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn label(self) -> &'static str {
        step_label(self.index())
    }
}

/// WMS status vocabulary and the step each status lands on.
///
/// Statuses missing from this table fall back to the first step; the WMS
/// vocabulary grows over time and an unfamiliar status is not an error.
const STATUS_TABLE: &[(&str, TimelineStep)] = &[
    ("CREATED", TimelineStep::OrderReceived),
    ("RELEASED", TimelineStep::Processing),
    ("PICKING", TimelineStep::Processing),
    ("PICKED", TimelineStep::Processing),
    ("PACKING", TimelineStep::Packing),
    ("PACKED", TimelineStep::Packing),
    ("MANIFESTED", TimelineStep::Shipped),
    ("DISPATCHED", TimelineStep::Shipped),
    ("DELIVERED", TimelineStep::Delivered),
];

/// Derived position of an order on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimelineState {
    pub(crate) step: TimelineStep,
}

impl TimelineState {
    pub(crate) fn from_status(status: &str) -> Self {
        Self {
            step: step_for_status(status),
        }
    }

    pub(crate) fn index(self) -> usize {
        self.step.index()
    }
}

pub(crate) fn step_for_status(status: &str) -> TimelineStep {
    STATUS_TABLE
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, step)| *step)
        .unwrap_or(TimelineStep::OrderReceived)
}

/// Human-readable label for a step index
pub(crate) fn step_label(index: usize) -> &'static str {
    match index {
        0 => "Order Received",
        1 => "Processing",
        2 => "Packing",
        3 => "Shipped",
        4 => "Delivered",
        _ => "Unknown Status",
    }
}

/// Rendering class of a single step relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StepState {
    Completed,
    Active,
    Pending,
}

pub(crate) fn classify_step(step_index: usize, current: usize) -> StepState {
    use std::cmp::Ordering;
    match step_index.cmp(&current) {
        Ordering::Less => StepState::Completed,
        Ordering::Equal => StepState::Active,
        Ordering::Greater => StepState::Pending,
    }
}

/// Classification of `total` ordered steps for the given current index
pub(crate) fn classify_steps(current: usize, total: usize) -> Vec<StepState> {
    (0..total).map(|i| classify_step(i, current)).collect()
}

/// Fraction of the timeline covered: `current / (total - 1)`, clamped to 0..=1
pub(crate) fn progress_fraction(current: usize, total: usize) -> f64 {
    if total <= 1 {
        return 0.0;
    }
    (current as f64 / (total - 1) as f64).clamp(0.0, 1.0)
}
