use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use fractal_tree::{render, RenderConfig, Traversal};
use log::error;

#[derive(Parser)]
#[command(name = "fractal-tree")]
#[command(version)]
#[command(about = "Draw a recursive fractal tree, optionally as an animated GIF", long_about = None)]
struct Cli {
    /// How deep the branches go
    #[arg(long, default_value_t = 5)]
    depth: u32,

    /// Image height
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Image width
    #[arg(long, default_value_t = 300)]
    width: u32,

    /// Angle between branches
    #[arg(long, default_value_t = 45, allow_hyphen_values = true)]
    angle: i32,

    /// Tilt is an additional angle applied to all branches
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    tilt: i32,

    /// Output filename of the animation
    #[arg(long, default_value = "out.gif")]
    out: PathBuf,

    /// Animation delay, in hundredths of a second
    #[arg(long, default_value_t = 10)]
    delay: u16,

    /// Generate animated gif
    #[arg(long)]
    gif: bool,

    /// Walk the tree with an explicit stack instead of recursion
    #[arg(long)]
    iterative: bool,
}

impl From<Cli> for RenderConfig {
    fn from(cli: Cli) -> Self {
        RenderConfig {
            depth: cli.depth,
            width: cli.width,
            height: cli.height,
            branch_angle: cli.angle,
            tilt: cli.tilt,
            delay: cli.delay,
            gif: cli.gif,
            out: cli.out,
            traversal: if cli.iterative {
                Traversal::Iterative
            } else {
                Traversal::Recursive
            },
        }
    }
}

fn run(config: &RenderConfig) -> anyhow::Result<()> {
    let summary = render(config).context("Rendering fractal tree failed")?;
    println!(
        "Drew {} segments{}",
        summary.segments,
        if config.gif {
            format!(", {} frames in {}", summary.frames, config.out.display())
        } else {
            String::new()
        }
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RenderConfig::from(Cli::parse());
    if let Err(e) = run(&config) {
        error!("{:#}", e);
        process::exit(1);
    }
}
