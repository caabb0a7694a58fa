mod scene;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use palette_raster::Bitmap;
use scene::Scene;

/// Renders every polygon type into an 8-bit paletted bitmap.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bitmap width in pixels
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Bitmap height in pixels
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Window magnification
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Render a single frame to this image file instead of opening a window
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Texture image with power-of-two sides (default: built-in checkerboard)
    #[arg(long, value_name = "FILE")]
    texture: Option<PathBuf>,

    /// Animation time of the screenshot frame, in seconds
    #[arg(long, default_value_t = 0.6)]
    time: f32,
}

fn save_frame(
    scene: &Scene,
    bitmap: &mut Bitmap,
    time: f32,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    scene.render(bitmap, time)?;
    bitmap.save_png(scene.palette(), path)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "viewer")]
fn run(args: &Args, scene: &mut Scene, bitmap: &mut Bitmap) -> Result<(), Box<dyn Error>> {
    use palette_raster::window::{FrameLimiter, Window, WindowEvent};

    let mut window = Window::new("palette-raster", args.width, args.height, args.scale)?;
    let mut limiter = FrameLimiter::new(&window);
    let mut time = 0.0;
    let mut paused = false;

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => window.resize(w, h),
            WindowEvent::TogglePause => paused = !paused,
            WindowEvent::ToggleClip => scene.toggle_clip(),
            WindowEvent::Screenshot => {
                save_frame(scene, bitmap, time, Path::new("screenshot.png"))?
            }
            WindowEvent::None => {}
        }

        let delta = limiter.wait_and_get_delta(&window);
        if !paused {
            time += delta as f32 / 1000.0;
        }

        scene.render(bitmap, time)?;
        window.present(bitmap, scene.palette())?;
    }

    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run(args: &Args, scene: &mut Scene, bitmap: &mut Bitmap) -> Result<(), Box<dyn Error>> {
    log::warn!("built without the `viewer` feature, rendering a single frame instead");
    save_frame(scene, bitmap, args.time, Path::new("palette-raster.png"))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut scene = Scene::new(args.texture.as_deref())?;
    let mut bitmap = Bitmap::new(args.width, args.height);

    match &args.screenshot {
        Some(path) => save_frame(&scene, &mut bitmap, args.time, path),
        None => run(&args, &mut scene, &mut bitmap),
    }
}
