pub mod evaluate_tile_rayon;
pub mod evaluate_tile_serial;

pub use evaluate_tile_rayon::evaluate_tile_rayon;
pub use evaluate_tile_serial::evaluate_tile;
