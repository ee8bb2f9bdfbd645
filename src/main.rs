use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pixmatrix::animation::TokioClock;
use pixmatrix::dispatch::encode_frame;
use pixmatrix::images::FileImageSource;
use pixmatrix::transport::DirectoryTransport;
use pixmatrix::{scene, AnimationPhase, Compositor, DisplayConfig, DisplaySession, SceneSpec};

#[derive(Parser)]
#[command(name = "pixmatrix", about = "Render pixel-matrix scenes to PNG frames")]
struct Cli {
    /// Matrix width in pixels
    #[arg(long, default_value_t = 32, global = true)]
    width: u32,
    /// Matrix height in pixels
    #[arg(long, default_value_t = 8, global = true)]
    height: u32,
    /// Brightness 0-255
    #[arg(long, default_value_t = 255, global = true)]
    brightness: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a single frame of a scene at a point in animation time
    Render {
        scene: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Animation time in seconds
        #[arg(long, default_value_t = 0.0)]
        time: f64,
    },
    /// Run a scene for a while and write every dispatched frame to a directory
    Animate {
        scene: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 3.0)]
        seconds: f64,
    },
}

fn read_scene(path: &Path) -> anyhow::Result<SceneSpec> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    SceneSpec::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))
}

/// Images referenced by a scene file may live next to it.
fn scene_dir(path: &Path) -> Vec<PathBuf> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    vec![dir.to_path_buf()]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            scene: path,
            output,
            time,
        } => {
            let spec = read_scene(&path)?;
            let config = DisplayConfig {
                width: cli.width,
                height: cli.height,
                ..Default::default()
            };
            config.validate()?;
            let images = FileImageSource::new(scene_dir(&path), config.fetch_timeout_ms);
            let prepared = scene::prepare(spec.background, &spec.elements, config.width, &images).await;
            let mut compositor = Compositor::new(config.width, config.height);
            let frame = compositor.render(&prepared, AnimationPhase::at(time), cli.brightness);
            std::fs::write(&output, encode_frame(&frame)?)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {}x{} frame to {}", frame.width(), frame.height(), output.display());
        }
        Command::Animate {
            scene: path,
            out_dir,
            seconds,
        } => {
            let spec = read_scene(&path)?;
            let config = DisplayConfig {
                width: cli.width,
                height: cli.height,
                brightness: cli.brightness,
                allowed_image_dirs: scene_dir(&path),
                ..Default::default()
            };
            config.validate()?;
            let transport = DirectoryTransport::new(&out_dir)?;
            let images = Arc::new(FileImageSource::new(
                config.allowed_image_dirs.clone(),
                config.fetch_timeout_ms,
            ));
            let session = DisplaySession::with_parts(
                config,
                Box::new(transport),
                images,
                Arc::new(TokioClock::new()),
            );
            session.draw(&spec).await?;
            tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
            session.shutdown().await;
            println!("frames written to {}", out_dir.display());
        }
    }
    Ok(())
}
