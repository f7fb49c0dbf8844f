use alchemy_camera::{Camera, CameraMovement};
use alchemy_common::{DemoConfig, DistanceMetric};
use alchemy_scene::{DebugTextRenderer, Renderer, Scene};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alchemy-cli", about = "Headless tools for the alchemy demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info,
    /// Print the frame plan seen from a viewpoint, billboards back to front
    Sort {
        /// Eye position
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        eye: Option<Vec<f32>>,
        /// Distance metric (euclidean or squared)
        #[arg(long)]
        metric: Option<DistanceMetric>,
    },
    /// Fly the camera through a script and print its state after each step
    Fly {
        /// Steps: `forward:SECS` (also backward/left/right/up/down),
        /// `look:DX,DY`, `scroll:DY`
        #[arg(allow_negative_numbers = true)]
        steps: Vec<Step>,
    },
}

/// One scripted camera input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Move(CameraMovement, f32),
    Look(f32, f32),
    Scroll(f32),
}

impl Step {
    fn apply(self, camera: &mut Camera) {
        match self {
            Step::Move(direction, secs) => camera.process_keyboard(direction, secs),
            Step::Look(dx, dy) => camera.process_mouse_movement(dx, dy, true),
            Step::Scroll(dy) => camera.process_mouse_scroll(dy),
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, args) = s
            .split_once(':')
            .ok_or_else(|| format!("expected NAME:ARGS, got {s:?}"))?;
        let num = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("bad number {v:?} in {s:?}: {e}"))
        };
        let direction = match name {
            "forward" => Some(CameraMovement::Forward),
            "backward" => Some(CameraMovement::Backward),
            "left" => Some(CameraMovement::Left),
            "right" => Some(CameraMovement::Right),
            "up" => Some(CameraMovement::Up),
            "down" => Some(CameraMovement::Down),
            _ => None,
        };
        if let Some(direction) = direction {
            return Ok(Step::Move(direction, num(args)?));
        }
        match name {
            "look" => {
                let (dx, dy) = args
                    .split_once(',')
                    .ok_or_else(|| format!("look expects DX,DY, got {args:?}"))?;
                Ok(Step::Look(num(dx)?, num(dy)?))
            }
            "scroll" => Ok(Step::Scroll(num(args)?)),
            other => Err(format!("unknown step {other:?}")),
        }
    }
}

fn describe(camera: &Camera) -> String {
    let p = camera.position();
    let f = camera.front();
    format!(
        "pos=({:.3}, {:.3}, {:.3}) front=({:.3}, {:.3}, {:.3}) yaw={:.2} pitch={:.2} zoom={:.2}",
        p.x,
        p.y,
        p.z,
        f.x,
        f.y,
        f.z,
        camera.yaw(),
        camera.pitch(),
        camera.zoom()
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("alchemy-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", config.to_json()?);
        }
        Commands::Sort { eye, metric } => {
            let camera = match eye.as_deref() {
                Some([x, y, z]) => {
                    let mut camera_config = config.camera;
                    camera_config.position = Vec3::new(*x, *y, *z);
                    Camera::from_config(&camera_config)
                }
                Some(other) => anyhow::bail!("--eye takes 3 values, got {}", other.len()),
                None => Camera::from_config(&config.camera),
            };
            let mut scene = Scene::demo(metric.unwrap_or(config.sort_metric));
            let plan = scene.plan_frame(&camera, config.window.aspect(), &config.projection);
            print!("{}", DebugTextRenderer::new().render(&plan));
        }
        Commands::Fly { steps } => {
            let mut camera = Camera::from_config(&config.camera);
            println!("start: {}", describe(&camera));
            for (i, step) in steps.iter().enumerate() {
                step.apply(&mut camera);
                println!("{i:>5}: {}", describe(&camera));
            }
        }
    }

    Ok(())
}
