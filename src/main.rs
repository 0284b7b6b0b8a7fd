use std::sync::Arc;
use std::time::Instant;

use mandel_tiles::core::data::transform::Transform;
use mandel_tiles::{
    CanvasPresenter, DEFAULT_POOL_SIZE, DeepBlueEasing, ProgressiveController, RenderDefaults,
    RenderSink, WorkerPool, export_zone_to_ppm, write_ppm,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let defaults = RenderDefaults::default();
    let request = defaults.build_request(false);
    let transform = Transform::anchored_to(request.zone, request.zoom);

    let width = (request.zone.width() * request.zoom).ceil() as u32;
    let height = (request.zone.height() * request.zoom).ceil() as u32;

    let pool = Arc::new(WorkerPool::with_escape_time(DEFAULT_POOL_SIZE)?);
    let presenter = Arc::new(CanvasPresenter::new(width, height, Box::new(DeepBlueEasing)));
    let controller =
        ProgressiveController::new(pool, Arc::clone(&presenter) as Arc<dyn RenderSink>);

    println!("Rendering Mandelbrot set progressively...");
    println!("View size: {}x{}", width, height);
    println!(
        "Depth: {}, target cell size: {}, max iterations: {}",
        request.depth, request.target_cell_size, request.nb_iteration
    );

    let start = Instant::now();
    controller.submit(request.clone(), transform)?;
    controller.join_all();
    println!("Duration:   {:?}", start.elapsed());

    if let Some(real) = presenter.real_cell_size() {
        println!("Real cell size: {:.4}x{:.4}", real.cell_w, real.cell_h);
    }

    std::fs::create_dir_all("output")?;
    let frame = presenter.composite()?;
    write_ppm(&frame, "output/mandelbrot.ppm")?;
    println!("Saved to output/mandelbrot.ppm");

    // Same view in one pass, for comparing against the refined result.
    let oneshot_start = Instant::now();
    export_zone_to_ppm(&request, &DeepBlueEasing, "output/mandelbrot_oneshot.ppm")?;
    println!("One-shot duration: {:?}", oneshot_start.elapsed());
    println!("Saved to output/mandelbrot_oneshot.ppm");

    Ok(())
}
