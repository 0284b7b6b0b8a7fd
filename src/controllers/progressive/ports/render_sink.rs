use crate::controllers::progressive::events::render_event::RenderEvent;

/// Output port of the progressive renderer.
///
/// `present` is called from run and fan-out threads; implementations
/// synchronize internally. A tile emission must have returned before
/// the level counts as drawn — the renderer relies on that to order
/// coarse layers strictly before their finer children.
pub trait RenderSink: Send + Sync {
    fn present(&self, event: RenderEvent);
}
