/// The pixel-space cell dimensions actually achieved at the finest
/// computed level. Step counts come from truncating division, so the
/// real cell size can differ from the requested target; it is surfaced
/// exactly rather than rounded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RealCellSize {
    pub cell_w: f64,
    pub cell_h: f64,
}
