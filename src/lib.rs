pub mod controllers;
pub mod core;
pub mod pool;
pub mod presenters;
pub mod storage;

pub use controllers::export::{export_zone, export_zone_to_ppm};
pub use controllers::progressive::data::{RenderDefaults, RenderRequest, RenderRequestError};
pub use controllers::progressive::events::RenderEvent;
pub use controllers::progressive::ports::RenderSink;
pub use controllers::progressive::{ProgressiveController, RenderQueue, render_progressive};
pub use pool::{DEFAULT_POOL_SIZE, WorkerPool};
pub use presenters::{CanvasPresenter, DeepBlueEasing};
pub use storage::write_ppm;
