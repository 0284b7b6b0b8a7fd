//! Progressive rendering application layer.
//!
//! Coordinates one render run at a time: requests enter through
//! [`ProgressiveController`], the supersession queue cancels whatever
//! ran before, and the orchestrator refines the view coarse-to-fine
//! through the worker pool, emitting [`events::RenderEvent`]s to the
//! [`ports::RenderSink`] port.

mod controller;
mod orchestrator;
mod render_queue;

pub mod data;
pub mod events;
pub mod ports;

pub use controller::ProgressiveController;
pub use orchestrator::render_progressive;
pub use render_queue::RenderQueue;
