use std::path::Path;

use log::{info, warn};

use crate::branch::{BranchGenerator, BranchNode};
use crate::config::{RenderConfig, Traversal, ANIMATION_DEPTH_WARNING, STATIC_OUTPUT};
use crate::error::Result;
use crate::frames::GifSink;
use crate::palette::Palette;
use crate::surface::Canvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    pub segments: u64,
    pub frames: usize,
}

/// Draws the whole tree into memory. The canvas and the captured frames
/// are handed back without touching the filesystem.
pub fn draw(config: &RenderConfig) -> Result<(Canvas, GifSink)> {
    config.validate()?;
    if config.gif && config.depth > ANIMATION_DEPTH_WARNING {
        warn!(
            "Animating depth {} captures {} frames",
            config.depth,
            config.segment_count()
        );
    }

    let mut canvas = Canvas::new(config.width, config.height)?;
    let loop_count = u16::try_from(config.depth).unwrap_or(u16::MAX);
    let mut frames = GifSink::new(Palette::tree(), loop_count);

    let generator = BranchGenerator::new(config);
    let root = BranchNode::root(config);
    match config.traversal {
        Traversal::Recursive => generator.generate(&mut canvas, &mut frames, root)?,
        Traversal::Iterative => generator.generate_iterative(&mut canvas, &mut frames, root)?,
    }
    Ok((canvas, frames))
}

/// Renders the tree to `out.png` in the working directory and, when
/// animating, the construction sequence to `config.out`.
pub fn render(config: &RenderConfig) -> Result<RenderSummary> {
    render_into(config, Path::new(STATIC_OUTPUT))
}

pub fn render_into(config: &RenderConfig, static_path: &Path) -> Result<RenderSummary> {
    info!(
        "Generating fractal tree: depth {}, {}x{}, angle {}, tilt {}",
        config.depth, config.width, config.height, config.branch_angle, config.tilt
    );
    let (canvas, frames) = draw(config)?;
    canvas.save(static_path)?;
    info!("Wrote {}", static_path.display());

    let mut summary = RenderSummary {
        segments: config.segment_count(),
        frames: 0,
    };
    if config.gif {
        summary.frames = frames.finish(&config.out)?;
        info!("Wrote {} frames to {}", summary.frames, config.out.display());
    }
    info!("Done, {} segments", summary.segments);
    Ok(summary)
}
