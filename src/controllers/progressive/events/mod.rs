pub mod render_event;

pub use render_event::RenderEvent;
