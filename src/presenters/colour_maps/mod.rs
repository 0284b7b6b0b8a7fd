pub mod deep_blue;

pub use deep_blue::DeepBlueEasing;
