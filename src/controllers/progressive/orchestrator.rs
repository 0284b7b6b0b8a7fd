use std::thread;

use log::debug;

use crate::controllers::progressive::data::render_request::{RenderRequest, RenderRequestError};
use crate::controllers::progressive::data::tile_data::TileData;
use crate::controllers::progressive::events::render_event::RenderEvent;
use crate::controllers::progressive::ports::render_sink::RenderSink;
use crate::core::actions::cancellation::{CancelToken, RunToken};
use crate::core::actions::split_zone::split_zone;
use crate::core::data::real_cell_size::RealCellSize;
use crate::core::data::tile_job::TileJob;
use crate::core::data::transform::Transform;
use crate::core::data::zone::Zone;
use crate::pool::worker_pool::WorkerPool;

struct LevelContext<'a> {
    request: &'a RenderRequest,
    transform: Transform,
    token: &'a RunToken,
    pool: &'a WorkerPool,
    sink: &'a dyn RenderSink,
    generation: u64,
}

/// Runs one progressive render from coarse (level 0) to fine
/// (level = depth), emitting a tile event per computed zone and a
/// retire event once a level's coarse tile is fully covered by its
/// four finer children.
///
/// Validation happens here, synchronously, before any tile is
/// submitted; a rejected request starts no partial run. Cancelling the
/// token stops the recursion at the next level entry and the returned
/// cell size is whatever the finest reached level achieved — a normal
/// outcome, not an error.
pub fn render_progressive(
    request: &RenderRequest,
    transform: Transform,
    token: &RunToken,
    pool: &WorkerPool,
    sink: &dyn RenderSink,
    generation: u64,
) -> Result<RealCellSize, RenderRequestError> {
    request.validate()?;

    let ctx = LevelContext {
        request,
        transform,
        token,
        pool,
        sink,
        generation,
    };

    Ok(render_level(request.zone, 0, &ctx))
}

fn render_level(zone: Zone, level: u32, ctx: &LevelContext<'_>) -> RealCellSize {
    let request = ctx.request;

    // Coarsest first: each level deeper halves the cell size until the
    // leaf level renders at the requested target.
    let zone_w = zone.width() * request.zoom;
    let zone_h = zone.height() * request.zoom;
    let level_cell_size = request.target_cell_size * 2f64.powi((request.depth - level) as i32);

    // Truncating division can undershoot the target; the achieved cell
    // size is surfaced exactly rather than rounded away. Step counts
    // clamp to 1 so a degenerate zone still yields a sample.
    let step_count_x = ((zone_w / level_cell_size).trunc() as u32).max(1);
    let step_count_y = ((zone_h / level_cell_size).trunc() as u32).max(1);
    let real = RealCellSize {
        cell_w: zone_w / f64::from(step_count_x),
        cell_h: zone_h / f64::from(step_count_y),
    };

    // Polled at level entry only; a tile already handed to the pool
    // runs to completion and its caller discards the result.
    if ctx.token.is_cancelled() {
        return real;
    }

    let points = ctx
        .pool
        .submit(TileJob {
            zone,
            step_count_x,
            step_count_y,
            nb_iteration: request.nb_iteration,
            threshold: request.threshold,
        })
        .wait();

    debug!(
        "run {} level {}: {} points at cell {:.3}x{:.3}",
        ctx.generation,
        level,
        points.len(),
        real.cell_w,
        real.cell_h
    );

    // The coarse tile must be presented before any child starts, so a
    // finer layer never composites under a coarser one.
    ctx.sink.present(RenderEvent::Tile(TileData {
        generation: ctx.generation,
        level,
        zone,
        points,
        cell_w: real.cell_w,
        cell_h: real.cell_h,
        nb_iteration: request.nb_iteration,
        is_debugging: request.is_debugging,
        transform: ctx.transform,
    }));

    if level < request.depth {
        let quadrants = split_zone(zone, 1);

        let children: Vec<RealCellSize> = thread::scope(|scope| {
            let handles: Vec<_> = quadrants
                .iter()
                .map(|quadrant| scope.spawn(move || render_level(*quadrant, level + 1, ctx)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("render branch panicked"))
                .collect()
        });

        // All leaves share the same target formula, so any child is
        // representative; the first quadrant in traversal order is the
        // deterministic pick.
        let finest = children[0];

        if ctx.token.is_cancelled() {
            return finest;
        }

        ctx.sink.present(RenderEvent::Retire {
            generation: ctx.generation,
            level,
            zone,
        });

        return finest;
    }

    real
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::point::Point;
    use crate::pool::ports::TileComputer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockSink {
        events: Mutex<Vec<RenderEvent>>,
    }

    impl MockSink {
        fn take_events(&self) -> Vec<RenderEvent> {
            let mut guard = self.events.lock().unwrap();
            std::mem::take(&mut *guard)
        }
    }

    impl RenderSink for MockSink {
        fn present(&self, event: RenderEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Counts pool dispatches; cancels a shared token on the first one.
    struct CountingComputer {
        calls: AtomicUsize,
        cancel_on_first: Option<RunToken>,
    }

    impl CountingComputer {
        fn new(cancel_on_first: Option<RunToken>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                cancel_on_first,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TileComputer for CountingComputer {
        fn compute(&self, job: &TileJob) -> Vec<Point> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                if let Some(token) = &self.cancel_on_first {
                    token.cancel();
                }
            }
            vec![Point {
                x: job.zone.xmin(),
                y: job.zone.ymin(),
                iterations: 0,
            }]
        }
    }

    fn request(zone: Zone, depth: u32) -> RenderRequest {
        RenderRequest {
            zone,
            zoom: 250.0,
            depth,
            target_cell_size: 4.0,
            nb_iteration: 50,
            threshold: 2.0,
            is_debugging: false,
        }
    }

    #[test]
    fn test_depth_zero_emits_exactly_one_tile_with_expected_grid() {
        let zone = Zone::new(-2.0, 1.0, -1.5, 1.5).unwrap();
        let request = request(zone, 0);
        let pool = WorkerPool::with_escape_time(4).unwrap();
        let sink = MockSink::default();
        let token = RunToken::new();
        let transform = Transform::anchored_to(zone, request.zoom);

        let real = render_progressive(&request, transform, &token, &pool, &sink, 1).unwrap();

        // 3.0 * 250 = 750 pixels per axis, cell target 4 → 187 steps.
        let events = sink.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RenderEvent::Tile(tile) => {
                assert_eq!(tile.level, 0);
                assert_eq!(tile.points.len(), 187 * 187);
                assert_eq!(tile.generation, 1);
            }
            other => panic!("expected a tile event, got {:?}", other),
        }

        let expected = 750.0 / 187.0;
        assert!((real.cell_w - expected).abs() < 1e-12);
        assert!((real.cell_h - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_request_is_rejected_before_any_work() {
        let zone = Zone::new(-2.0, 1.0, -1.5, 1.5).unwrap();
        let mut bad = request(zone, 0);
        bad.threshold = -1.0;

        let computer = Arc::new(CountingComputer::new(None));
        let pool = WorkerPool::new(2, Arc::clone(&computer) as Arc<dyn TileComputer>).unwrap();
        let sink = MockSink::default();
        let token = RunToken::new();

        let result = render_progressive(
            &bad,
            Transform::anchored_to(zone, 250.0),
            &token,
            &pool,
            &sink,
            1,
        );

        assert!(result.is_err());
        assert!(sink.take_events().is_empty());
        assert_eq!(computer.calls(), 0);
    }

    #[test]
    fn test_levels_refine_coarse_to_fine_and_retire_covered_layers() {
        let zone = Zone::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let request = request(zone, 1);
        let pool = WorkerPool::with_escape_time(4).unwrap();
        let sink = MockSink::default();
        let token = RunToken::new();

        render_progressive(
            &request,
            Transform::anchored_to(zone, request.zoom),
            &token,
            &pool,
            &sink,
            7,
        )
        .unwrap();

        let events = sink.take_events();
        assert_eq!(events.len(), 6); // 1 coarse + 4 children + 1 retire

        match &events[0] {
            RenderEvent::Tile(tile) => assert_eq!(tile.level, 0),
            other => panic!("first event must be the coarse tile, got {:?}", other),
        }

        let child_levels: Vec<u32> = events[1..5]
            .iter()
            .map(|event| match event {
                RenderEvent::Tile(tile) => tile.level,
                other => panic!("expected child tiles, got {:?}", other),
            })
            .collect();
        assert_eq!(child_levels, vec![1, 1, 1, 1]);

        match &events[5] {
            RenderEvent::Retire {
                level,
                zone: retired,
                generation,
            } => {
                assert_eq!(*level, 0);
                assert_eq!(*retired, zone);
                assert_eq!(*generation, 7);
            }
            other => panic!("last event must retire the coarse layer, got {:?}", other),
        }
    }

    #[test]
    fn test_child_tiles_cover_the_four_quadrants() {
        let zone = Zone::new(0.0, 2.0, 0.0, 2.0).unwrap();
        let request = request(zone, 1);
        let pool = WorkerPool::with_escape_time(4).unwrap();
        let sink = MockSink::default();
        let token = RunToken::new();

        render_progressive(
            &request,
            Transform::anchored_to(zone, request.zoom),
            &token,
            &pool,
            &sink,
            1,
        )
        .unwrap();

        let mut child_zones: Vec<Zone> = sink
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Tile(tile) if tile.level == 1 => Some(tile.zone),
                _ => None,
            })
            .collect();

        let mut expected = split_zone(zone, 1);
        let key = |z: &Zone| (z.xmin().to_bits(), z.ymin().to_bits());
        child_zones.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(child_zones, expected);
    }

    #[test]
    fn test_cancellation_after_level_zero_stops_all_submissions() {
        let zone = Zone::new(-2.0, 1.0, -1.5, 1.5).unwrap();
        let request = request(zone, 2);
        let token = RunToken::new();

        let computer = Arc::new(CountingComputer::new(Some(token.clone())));
        let pool = WorkerPool::new(4, Arc::clone(&computer) as Arc<dyn TileComputer>).unwrap();
        let sink = MockSink::default();

        render_progressive(
            &request,
            Transform::anchored_to(zone, request.zoom),
            &token,
            &pool,
            &sink,
            1,
        )
        .unwrap();

        // The level-0 tile cancelled the token, so no level-1 job may
        // reach the pool and the coarse layer is never retired.
        assert_eq!(computer.calls(), 1);

        let events = sink.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RenderEvent::Tile(_)));
    }

    #[test]
    fn test_cancelled_run_still_reports_a_cell_size() {
        let zone = Zone::new(-2.0, 1.0, -1.5, 1.5).unwrap();
        let request = request(zone, 1);
        let token = RunToken::new();
        token.cancel();

        let computer = Arc::new(CountingComputer::new(None));
        let pool = WorkerPool::new(2, Arc::clone(&computer) as Arc<dyn TileComputer>).unwrap();
        let sink = MockSink::default();

        let real = render_progressive(
            &request,
            Transform::anchored_to(zone, request.zoom),
            &token,
            &pool,
            &sink,
            1,
        )
        .unwrap();

        assert!(real.cell_w > 0.0);
        assert_eq!(computer.calls(), 0);
        assert!(sink.take_events().is_empty());
    }

    #[test]
    fn test_degenerate_zone_clamps_to_a_single_sample() {
        let zone = Zone::new(0.5, 0.5, 0.5, 0.5).unwrap();
        let request = request(zone, 0);
        let pool = WorkerPool::with_escape_time(2).unwrap();
        let sink = MockSink::default();
        let token = RunToken::new();

        let real = render_progressive(
            &request,
            Transform::anchored_to(zone, request.zoom),
            &token,
            &pool,
            &sink,
            1,
        )
        .unwrap();

        let events = sink.take_events();
        match &events[0] {
            RenderEvent::Tile(tile) => assert_eq!(tile.points.len(), 1),
            other => panic!("expected a tile event, got {:?}", other),
        }
        assert_eq!(real.cell_w, 0.0);
        assert_eq!(real.cell_h, 0.0);
    }
}
