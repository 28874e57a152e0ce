// Raster target the tree is stroked onto.
//
// The generator only talks to the `DrawingSurface` trait, so tests can swap
// the canvas for something that just records calls.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geo::{Coordinate, Line};
use image::{ImageOutputFormat, Rgb, RgbImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops;

use crate::error::{Error, Result};
use crate::palette::{BLACK, WHITE};

pub type Point2D = Coordinate<f64>;

pub trait DrawingSurface {
    /// Colour used by the next `stroke`.
    fn set_color(&mut self, color: Rgb<u8>);

    /// Adds a segment to the pending path. Nothing is visible until `stroke`.
    fn draw_line(&mut self, line: Line<f64>);

    /// Commits the pending path to the bitmap and clears it.
    fn stroke(&mut self) -> Result<()>;

    fn current_image(&self) -> &RgbImage;
}

pub struct Canvas {
    image: RgbImage,
    color: Rgb<u8>,
    path: Vec<Line<f64>>,
}

impl Canvas {
    // White canvas, black pen
    pub fn new(width: u32, height: u32) -> Result<Canvas> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvas { width, height });
        }
        Ok(Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
            color: BLACK,
            path: Vec::new(),
        })
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Writes the bitmap as a PNG.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::CreateOutput {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.image.write_to(&mut writer, ImageOutputFormat::Png)?;
        Ok(())
    }
}

impl DrawingSurface for Canvas {
    fn set_color(&mut self, color: Rgb<u8>) {
        self.color = color;
    }

    fn draw_line(&mut self, line: Line<f64>) {
        self.path.push(line);
    }

    fn stroke(&mut self) -> Result<()> {
        for line in self.path.drain(..) {
            // out of bounds pixels are clipped by imageproc
            draw_antialiased_line_segment_mut(
                &mut self.image,
                pixel(line.start),
                pixel(line.end),
                self.color,
                pixelops::interpolate,
            );
        }
        Ok(())
    }

    fn current_image(&self) -> &RgbImage {
        &self.image
    }
}

fn pixel(point: Point2D) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}
