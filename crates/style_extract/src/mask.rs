//! Binarized ink masks

use image::imageops::FilterType;
use image::DynamicImage;

/// Side of the square analysis canvas
pub const ANALYSIS_SIZE: u32 = 512;

/// Pixels whose mean RGB falls below this are ink
pub const INK_THRESHOLD: f32 = 128.0;

/// Ink/background classification of every pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl InkMask {
    /// Build a mask by evaluating `is_ink` at every pixel
    pub fn from_fn(width: u32, height: u32, mut is_ink: impl FnMut(u32, u32) -> bool) -> Self {
        let mut ink = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                ink.push(is_ink(x, y));
            }
        }
        Self { width, height, ink }
    }

    /// Resize to the analysis canvas and binarize.
    ///
    /// The sample is stretched to fill the canvas, ignoring its aspect ratio.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = if image.width() == ANALYSIS_SIZE && image.height() == ANALYSIS_SIZE {
            image.to_rgb8()
        } else {
            image
                .resize_exact(ANALYSIS_SIZE, ANALYSIS_SIZE, FilterType::Triangle)
                .to_rgb8()
        };

        Self::from_fn(rgb.width(), rgb.height(), |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let luminance = (r as f32 + g as f32 + b as f32) / 3.0;
            luminance < INK_THRESHOLD
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.ink[(y * self.width + x) as usize]
    }

    /// Coordinates of every ink pixel, row by row
    pub fn ink_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1);
        self.ink
            .iter()
            .enumerate()
            .filter(|(_, &ink)| ink)
            .map(move |(i, _)| (i as u32 % width, i as u32 / width))
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&ink| ink).count()
    }

    /// Fraction of pixels that are ink
    pub fn coverage(&self) -> f32 {
        if self.ink.is_empty() {
            return 0.0;
        }
        self.ink_count() as f32 / self.ink.len() as f32
    }

    /// Lengths of background runs enclosed by ink on both sides, per row
    pub fn row_gaps(&self) -> Vec<u32> {
        let mut gaps = Vec::new();
        for y in 0..self.height {
            let row = &self.ink[(y * self.width) as usize..((y + 1) * self.width) as usize];
            let mut last_ink: Option<usize> = None;
            for (x, &ink) in row.iter().enumerate() {
                if !ink {
                    continue;
                }
                if let Some(prev) = last_ink {
                    if x > prev + 1 {
                        gaps.push((x - prev - 1) as u32);
                    }
                }
                last_ink = Some(x);
            }
        }
        gaps
    }
}
