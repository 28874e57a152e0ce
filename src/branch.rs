// Recursive subdivision of the fractal tree.
//
// Every call draws one branch from its origin, then spawns two shorter
// children at its tip, rotated by the branch angle either side of the parent
// and biased by the tilt. Nothing is kept once a branch is drawn; the tree
// only exists as the recursion state.

use geo::Line;
use image::Rgb;
use log::debug;

use crate::config::{RenderConfig, CHILD_SCALE, ROOT_ANGLE};
use crate::error::Result;
use crate::frames::FrameSink;
use crate::palette::{BLACK, GREEN};
use crate::surface::{DrawingSurface, Point2D};

/// State of one pending branch. `angle` is in degrees, 90 points up the
/// screen, and is never wrapped into [0, 360).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchNode {
    pub depth: u32,
    pub origin: Point2D,
    pub length: f64,
    pub angle: f64,
}

impl BranchNode {
    // Trunk standing on the bottom edge, pointing straight up
    pub fn root(config: &RenderConfig) -> BranchNode {
        let (x, y) = config.root_origin();
        BranchNode {
            depth: config.depth,
            origin: Point2D { x, y },
            length: config.trunk_length(),
            angle: ROOT_ANGLE,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.depth == 0
    }

    /// Tip of the branch. Both offsets are subtracted so that the angle
    /// reads counter-clockwise on a canvas whose y axis grows downwards.
    pub fn end_point(&self) -> Point2D {
        let rad = self.angle * std::f64::consts::PI / 180.0;
        Point2D {
            x: self.origin.x - self.length * rad.cos(),
            y: self.origin.y - self.length * rad.sin(),
        }
    }

    // The last generation before termination carries the leaves
    pub fn color(&self) -> Rgb<u8> {
        if self.depth != 1 {
            BLACK
        } else {
            GREEN
        }
    }

    /// Left and right child growing from `tip`.
    pub fn children(&self, tip: Point2D, tilt: f64, branch_angle: f64) -> [BranchNode; 2] {
        let child = |angle| BranchNode {
            depth: self.depth.saturating_sub(1),
            origin: tip,
            length: self.length * CHILD_SCALE,
            angle,
        };
        [
            child(tilt + self.angle - branch_angle),
            child(tilt + self.angle + branch_angle),
        ]
    }
}

/// A branch ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub node: BranchNode,
    pub line: Line<f64>,
    pub color: Rgb<u8>,
}

pub struct BranchGenerator {
    tilt: f64,
    branch_angle: f64,
    delay: u16,
    animate: bool,
}

impl BranchGenerator {
    pub fn new(config: &RenderConfig) -> BranchGenerator {
        BranchGenerator {
            tilt: f64::from(config.tilt),
            branch_angle: f64::from(config.branch_angle),
            delay: config.delay,
            animate: config.gif,
        }
    }

    /// Geometry and colour of `node`, or `None` once the depth ran out.
    pub fn branch(&self, node: &BranchNode) -> Option<Branch> {
        if node.is_terminal() {
            return None;
        }
        Some(Branch {
            node: *node,
            line: Line::new(node.origin, node.end_point()),
            color: node.color(),
        })
    }

    /// Draws the subtree rooted at `node`, depth first, left before right.
    /// When animating, the surface is captured after every segment.
    pub fn generate<S, F>(&self, surface: &mut S, frames: &mut F, node: BranchNode) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
        F: FrameSink + ?Sized,
    {
        let branch = match self.branch(&node) {
            Some(branch) => branch,
            None => return Ok(()),
        };
        self.draw(surface, frames, &branch)?;
        for child in node.children(branch.line.end, self.tilt, self.branch_angle) {
            self.generate(surface, frames, child)?;
        }
        Ok(())
    }

    /// Same drawing as `generate`, driven by an explicit work stack instead
    /// of the call stack.
    pub fn generate_iterative<S, F>(
        &self,
        surface: &mut S,
        frames: &mut F,
        node: BranchNode,
    ) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
        F: FrameSink + ?Sized,
    {
        for branch in self.branches(node) {
            self.draw(surface, frames, &branch)?;
        }
        Ok(())
    }

    /// Every branch of the subtree in drawing order.
    pub fn branches(&self, node: BranchNode) -> Branches<'_> {
        Branches {
            generator: self,
            pending: vec![node],
        }
    }

    fn draw<S, F>(&self, surface: &mut S, frames: &mut F, branch: &Branch) -> Result<()>
    where
        S: DrawingSurface + ?Sized,
        F: FrameSink + ?Sized,
    {
        debug!(
            "{:2}: ({:.1}, {:.1}) -> ({:.1}, {:.1}), angle {}",
            branch.node.depth,
            branch.line.start.x,
            branch.line.start.y,
            branch.line.end.x,
            branch.line.end.y,
            branch.node.angle
        );
        surface.set_color(branch.color);
        surface.draw_line(branch.line);
        surface.stroke()?;
        if self.animate {
            frames.push_frame(surface.current_image(), self.delay)?;
        }
        Ok(())
    }
}

/// Pre-order walk over the tree held on the heap. Stack growth is linear in
/// the depth, the same as the recursive walk.
pub struct Branches<'a> {
    generator: &'a BranchGenerator,
    pending: Vec<BranchNode>,
}

impl<'a> Iterator for Branches<'a> {
    type Item = Branch;

    fn next(&mut self) -> Option<Branch> {
        while let Some(node) = self.pending.pop() {
            let branch = match self.generator.branch(&node) {
                Some(branch) => branch,
                None => continue,
            };
            let [left, right] =
                node.children(branch.line.end, self.generator.tilt, self.generator.branch_angle);
            // right goes underneath so the left subtree comes out first
            self.pending.push(right);
            self.pending.push(left);
            return Some(branch);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Traversal;
    use crate::error::Error;
    use image::error::{LimitError, LimitErrorKind};
    use image::{ImageError, RgbImage};

    // Records every stroke; its "bitmap" is one pixel holding the stroke count
    #[derive(Default)]
    struct RecordingSurface {
        color: Option<Rgb<u8>>,
        pending: Vec<Line<f64>>,
        strokes: Vec<(Line<f64>, Rgb<u8>)>,
        image: RgbImage,
        fail_after: Option<usize>,
    }

    impl DrawingSurface for RecordingSurface {
        fn set_color(&mut self, color: Rgb<u8>) {
            self.color = Some(color);
        }

        fn draw_line(&mut self, line: Line<f64>) {
            self.pending.push(line);
        }

        fn stroke(&mut self) -> Result<()> {
            if self.fail_after == Some(self.strokes.len()) {
                return Err(Error::Image(ImageError::Limits(LimitError::from_kind(
                    LimitErrorKind::InsufficientMemory,
                ))));
            }
            let color = self.color.expect("stroke before set_color");
            for line in self.pending.drain(..) {
                self.strokes.push((line, color));
            }
            self.image = RgbImage::from_pixel(1, 1, Rgb([self.strokes.len() as u8, 0, 0]));
            Ok(())
        }

        fn current_image(&self) -> &RgbImage {
            &self.image
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(u8, u16)>,
    }

    impl FrameSink for RecordingSink {
        fn push_frame(&mut self, image: &RgbImage, delay: u16) -> Result<()> {
            self.frames.push((image.get_pixel(0, 0).0[0], delay));
            Ok(())
        }
    }

    fn config(depth: u32) -> RenderConfig {
        RenderConfig {
            depth,
            ..RenderConfig::default()
        }
    }

    fn run(config: &RenderConfig) -> (RecordingSurface, RecordingSink) {
        let generator = BranchGenerator::new(config);
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let root = BranchNode::root(config);
        let result = match config.traversal {
            Traversal::Recursive => generator.generate(&mut surface, &mut sink, root),
            Traversal::Iterative => generator.generate_iterative(&mut surface, &mut sink, root),
        };
        result.unwrap();
        (surface, sink)
    }

    fn assert_close(a: Point2D, b: Point2D) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn draws_full_binary_tree() {
        for depth in 0..=10 {
            for traversal in [Traversal::Recursive, Traversal::Iterative] {
                let config = RenderConfig {
                    traversal,
                    ..config(depth)
                };
                let (surface, _) = run(&config);
                assert_eq!(surface.strokes.len(), (1usize << depth) - 1);
            }
        }
    }

    #[test]
    fn zero_depth_draws_nothing() {
        let config = RenderConfig {
            gif: true,
            ..config(0)
        };
        let (surface, sink) = run(&config);
        assert!(surface.strokes.is_empty());
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn one_frame_per_segment_captured_after_its_stroke() {
        let config = RenderConfig {
            gif: true,
            delay: 7,
            ..config(5)
        };
        let (surface, sink) = run(&config);
        assert_eq!(surface.strokes.len(), 31);
        assert_eq!(sink.frames.len(), 31);
        for (i, &(strokes_seen, delay)) in sink.frames.iter().enumerate() {
            assert_eq!(strokes_seen as usize, i + 1);
            assert_eq!(delay, 7);
        }
    }

    #[test]
    fn no_frames_without_animation() {
        let (surface, sink) = run(&config(4));
        assert_eq!(surface.strokes.len(), 15);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn renders_are_deterministic() {
        let config = RenderConfig {
            tilt: 5,
            branch_angle: 33,
            ..config(8)
        };
        let (first, _) = run(&config);
        let (second, _) = run(&config);
        assert_eq!(first.strokes, second.strokes);
    }

    #[test]
    fn iterative_walk_matches_recursion() {
        let recursive = RenderConfig {
            tilt: -12,
            branch_angle: 20,
            ..config(9)
        };
        let iterative = RenderConfig {
            traversal: Traversal::Iterative,
            ..recursive.clone()
        };
        assert_eq!(run(&recursive).0.strokes, run(&iterative).0.strokes);
    }

    #[test]
    fn leaves_are_green_and_wood_is_black() {
        let config = config(6);
        let generator = BranchGenerator::new(&config);
        let branches: Vec<Branch> = generator.branches(BranchNode::root(&config)).collect();
        assert_eq!(branches.len(), 63);
        for branch in &branches {
            let expected = if branch.node.depth == 1 { GREEN } else { BLACK };
            assert_eq!(branch.color, expected);
        }
        assert_eq!(branches.iter().filter(|b| b.color == GREEN).count(), 32);
    }

    #[test]
    fn end_points_follow_screen_trigonometry() {
        let config = RenderConfig {
            tilt: 11,
            branch_angle: 37,
            ..config(7)
        };
        let generator = BranchGenerator::new(&config);
        for branch in generator.branches(BranchNode::root(&config)) {
            let node = branch.node;
            let rad = node.angle * std::f64::consts::PI / 180.0;
            assert_close(branch.line.start, node.origin);
            assert_close(
                branch.line.end,
                Point2D {
                    x: node.origin.x - node.length * rad.cos(),
                    y: node.origin.y - node.length * rad.sin(),
                },
            );
        }
    }

    #[test]
    fn children_shrink_and_turn() {
        let node = BranchNode {
            depth: 3,
            origin: Point2D { x: 10.0, y: 20.0 },
            length: 50.0,
            angle: 100.0,
        };
        let tip = node.end_point();
        let [left, right] = node.children(tip, 4.0, 30.0);

        for child in [left, right] {
            assert_eq!(child.depth, 2);
            assert_eq!(child.origin, tip);
            assert_eq!(child.length, 50.0 * 0.6);
        }
        assert_eq!(left.angle, 4.0 + 100.0 - 30.0);
        assert_eq!(right.angle, 4.0 + 100.0 + 30.0);
    }

    #[test]
    fn angles_are_never_wrapped() {
        let config = RenderConfig {
            tilt: 170,
            ..config(4)
        };
        let generator = BranchGenerator::new(&config);
        let deepest = generator
            .branches(BranchNode::root(&config))
            .map(|b| b.node.angle)
            .fold(f64::MIN, f64::max);
        // 90 + 3 * (170 + 45)
        assert_eq!(deepest, 735.0);
    }

    #[test]
    fn single_generation_is_one_green_trunk() {
        let config = RenderConfig {
            width: 300,
            height: 200,
            branch_angle: 45,
            tilt: 0,
            ..config(1)
        };
        let (surface, _) = run(&config);
        assert_eq!(surface.strokes.len(), 1);
        let (line, color) = surface.strokes[0];
        assert_close(line.start, Point2D { x: 150.0, y: 200.0 });
        assert_close(line.end, Point2D { x: 150.0, y: 120.0 });
        assert_eq!(color, GREEN);
    }

    #[test]
    fn trunk_then_left_subtree_first() {
        let config = config(2);
        let (surface, _) = run(&config);
        let angles: Vec<f64> = surface
            .strokes
            .iter()
            .map(|(line, _)| {
                let dx = line.start.x - line.end.x;
                let dy = line.start.y - line.end.y;
                dy.atan2(dx).to_degrees().round()
            })
            .collect();
        assert_eq!(angles, vec![90.0, 45.0, 135.0]);
    }

    #[test]
    fn surface_failure_aborts_the_walk() {
        for traversal in [Traversal::Recursive, Traversal::Iterative] {
            let config = RenderConfig {
                traversal,
                gif: true,
                ..config(5)
            };
            let generator = BranchGenerator::new(&config);
            let mut surface = RecordingSurface {
                fail_after: Some(4),
                ..RecordingSurface::default()
            };
            let mut sink = RecordingSink::default();
            let root = BranchNode::root(&config);
            let result = match traversal {
                Traversal::Recursive => generator.generate(&mut surface, &mut sink, root),
                Traversal::Iterative => generator.generate_iterative(&mut surface, &mut sink, root),
            };
            assert!(matches!(result, Err(Error::Image(_))));
            assert_eq!(surface.strokes.len(), 4);
            assert_eq!(sink.frames.len(), 4);
        }
    }
}
