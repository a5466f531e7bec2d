/// Simulated Auto-Zoom Session
///
/// Closes the control loop without a camera: a scripted scene is rendered
/// through the current zoom, the service tracks the players and drives a
/// simulated actuator, and the zoom trace is printed.
///
/// Scene: one player walks in from the left and stops near the center, a
/// second player stands still on the right, and the detector misses the
/// walker for a few frames midway.
///
/// Usage:
///   cargo run --example simulate_session [sport] [frames] [config.json]
use autozoom::simulated::{SharedZoom, SimulatedZoomActuator, ZoomingSceneDetector};
use autozoom::{
    AutoZoomConfig, AutoZoomService, Bbox, Detection, ImageData, ImageFormat, SportMode,
};
use std::env;
use std::time::Instant;

const FRAME_MS: u64 = 33;

fn scene(frames: usize) -> Vec<Vec<Detection>> {
    (0..frames)
        .map(|f| {
            let walker_x = (0.15 + f as f32 * 0.004).min(0.48);
            let mut players = vec![Detection::subject(
                Bbox::from_center(0.8, 0.55, 0.03, 0.09),
                0.75,
            )];
            // Occlusion
            if !(120..126).contains(&f) {
                players.push(Detection::subject(
                    Bbox::from_center(walker_x, 0.5, 0.04, 0.1),
                    0.9,
                ));
            }
            players
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    autozoom::init()?;

    let args: Vec<String> = env::args().collect();
    let sport = args
        .get(1)
        .and_then(|s| s.parse::<SportMode>().ok())
        .unwrap_or(SportMode::Basketball);
    let frames: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(300);
    let config = match args.get(3) {
        Some(path) => AutoZoomConfig::from_file(path)?,
        None => AutoZoomConfig::default_for(sport),
    };

    println!("Auto-zoom simulation v{}", autozoom::version());
    println!("  Sport:  {}", sport);
    println!("  Frames: {}", frames);
    println!("  Target height ratio: {:.2}\n", config.target_height_ratio);

    let zoom = SharedZoom::default();
    let actuator = SimulatedZoomActuator::new(zoom.clone());
    let actuation_log = actuator.log();
    let mut service = AutoZoomService::with_config(
        Box::new(ZoomingSceneDetector::new(zoom.clone(), scene(frames))),
        Box::new(actuator),
        sport,
        config,
    );

    let image = ImageData::blank(320, 180, ImageFormat::RGB);
    let start = Instant::now();

    for frame in 0..frames as u64 {
        let result = service.process_frame_at(
            &image,
            frame,
            image.size(),
            sport,
            zoom.get(),
            frame * FRAME_MS,
        );

        if frame % 15 == 0 {
            let target = result
                .target
                .as_ref()
                .map(|t| {
                    let velocity = service
                        .tracker()
                        .filter(t.id)
                        .map(|kf| kf.velocity())
                        .map(|(vx, vy)| format!(" v=({:+.4}, {:+.4})", vx, vy))
                        .unwrap_or_default();
                    format!("#{} h={:.3}{}", t.id, t.bbox.height(), velocity)
                })
                .unwrap_or_else(|| "-".to_string());
            println!(
                "Frame {:4}: zoom={:.3} tracks={} active={} target={}",
                frame,
                zoom.get(),
                result.tracks.len(),
                result.active_tracks.len(),
                target
            );
        }
    }

    let elapsed = start.elapsed();
    println!("\nActuations: {}", actuation_log.count());
    println!("Final zoom: {:.3}", zoom.get());
    println!(
        "Processed {} frames in {:.2} ms ({:.1} µs/frame)",
        frames,
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1e6 / frames.max(1) as f64
    );

    service.cleanup();
    Ok(())
}
