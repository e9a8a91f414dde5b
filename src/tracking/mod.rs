//! Order tracking: identifier normalization, status-to-timeline mapping,
//! the lookup flow and rendering of its result.

mod flow;
mod normalize;
mod timeline;
mod view;

pub(crate) use flow::Tracker;
pub(crate) use timeline::StepState;
pub(crate) use view::{RenderOptions, RenderedView, Tone, render};

#[cfg(test)]
pub(crate) use timeline::TimelineState;
#[cfg(test)]
pub(crate) use view::{Outcome, ViewState};
