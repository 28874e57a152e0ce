// Frame capture for the animated rendering. Every captured bitmap is reduced
// to a fixed palette on the way in, and the whole sequence is encoded as a
// GIF once drawing is over.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, RgbImage};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::palette::Palette;

pub trait FrameSink {
    /// Appends a snapshot. `delay` is in hundredths of a second.
    fn push_frame(&mut self, image: &RgbImage, delay: u16) -> Result<()>;
}

// One captured, already quantized snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub image: RgbImage,
    pub delay: u16,
}

pub struct GifSink {
    palette: Palette,
    frames: Vec<Frame>,
    loop_count: u16,
}

impl GifSink {
    /// `loop_count` of 0 loops forever.
    pub fn new(palette: Palette, loop_count: u16) -> GifSink {
        GifSink {
            palette,
            frames: Vec::new(),
            loop_count,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encodes the captured frames into an animated GIF at `path`.
    /// Returns the number of frames written.
    pub fn finish(self, path: &Path) -> Result<usize> {
        let file = File::create(path).map_err(|source| Error::CreateOutput {
            path: path.to_path_buf(),
            source,
        })?;
        if self.frames.is_empty() {
            // the encoder only emits a header alongside the first frame
            warn!("No frames captured, {} left empty", path.display());
            return Ok(0);
        }

        let count = self.frames.len();
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.set_repeat(repeat(self.loop_count))?;
        encoder.encode_frames(self.frames.into_iter().map(|frame| {
            image::Frame::from_parts(
                DynamicImage::ImageRgb8(frame.image).into_rgba8(),
                0,
                0,
                Delay::from_numer_denom_ms(u32::from(frame.delay) * 10, 1),
            )
        }))?;
        debug!("Encoded {} frames into {}", count, path.display());
        Ok(count)
    }
}

impl FrameSink for GifSink {
    fn push_frame(&mut self, image: &RgbImage, delay: u16) -> Result<()> {
        self.frames.push(Frame {
            image: self.palette.quantize(image),
            delay,
        });
        Ok(())
    }
}

fn repeat(loop_count: u16) -> Repeat {
    match loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    }
}
