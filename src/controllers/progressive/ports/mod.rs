//! Port definitions for the progressive controller.

pub mod render_sink;

pub use render_sink::RenderSink;
