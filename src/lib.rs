//! Deterministic fractal tree renderer.
//!
//! A binary tree of line segments is grown from the bottom centre of the
//! canvas: every branch splits into two children 0.6 times its length,
//! turned by the branch angle either side and biased by a constant tilt.
//! The last generation is drawn green, everything else black. Optionally
//! each stroke is captured as a frame of an animated GIF.

pub mod branch;
pub mod config;
pub mod error;
pub mod frames;
pub mod palette;
pub mod render;
pub mod surface;

pub use branch::{Branch, BranchGenerator, BranchNode};
pub use config::{RenderConfig, Traversal};
pub use error::{Error, Result};
pub use render::{render, RenderSummary};
