use std::path::PathBuf;

use crate::error::{Error, Result};

// Fixed geometry of the tree
pub const TRUNK_RATIO: f64 = 0.4;
pub const CHILD_SCALE: f64 = 0.6;
pub const ROOT_ANGLE: f64 = 90.0;

// The static image always lands here, `out` only names the animation
pub const STATIC_OUTPUT: &str = "out.png";

// Past this depth an animation holds millions of frames
pub const ANIMATION_DEPTH_WARNING: u32 = 20;

/// How the branch generator walks the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Native call stack, one frame per level.
    #[default]
    Recursive,
    /// Explicit heap-allocated work stack, same visiting order.
    Iterative,
}

/// Parameters of one render. Read once, never mutated while drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub depth: u32,
    pub width: u32,
    pub height: u32,
    pub branch_angle: i32,
    pub tilt: i32,
    // hundredths of a second per frame
    pub delay: u16,
    pub gif: bool,
    pub out: PathBuf,
    pub traversal: Traversal,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            width: 300,
            height: 200,
            branch_angle: 45,
            tilt: 0,
            delay: 10,
            gif: false,
            out: PathBuf::from("out.gif"),
            traversal: Traversal::Recursive,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Origin of the trunk: bottom centre of the canvas.
    pub fn root_origin(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height))
    }

    pub fn trunk_length(&self) -> f64 {
        f64::from(self.height) * TRUNK_RATIO
    }

    /// Number of segments (and frames, when animating) a full render produces.
    pub fn segment_count(&self) -> u64 {
        // 2^N - 1, saturating for depths no canvas could hold anyway
        1u64.checked_shl(self.depth).map_or(u64::MAX, |n| n - 1)
    }
}
