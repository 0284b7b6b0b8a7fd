use crate::controllers::progressive::data::run_summary::RunSummary;
use crate::controllers::progressive::data::tile_data::TileData;
use crate::core::data::zone::Zone;

/// Events a run emits towards the presentation layer, in order:
/// `Started` once, then interleaved `Tile`/`Retire`, then — only for
/// the run that is still authoritative — `Completed`.
///
/// `Started`/`Completed` double as the is-computing status transitions.
/// `Retire` names a coarse layer that is fully covered by its four
/// finer children and can be dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Started {
        generation: u64,
    },
    Tile(TileData),
    Retire {
        generation: u64,
        level: u32,
        zone: Zone,
    },
    Completed(RunSummary),
}
