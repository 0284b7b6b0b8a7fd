//! Presentation adapters: colour mapping and the software canvas that
//! consumes render events.

pub mod canvas;
pub mod colour_map;
pub mod colour_maps;
pub mod easing;

pub use canvas::CanvasPresenter;
pub use colour_map::IterationColourMap;
pub use colour_maps::DeepBlueEasing;
