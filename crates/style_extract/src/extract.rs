//! Slant, stroke width, spacing and messiness estimation

use crate::{ExtractError, InkMask, Result};
use image::DynamicImage;
use style_model::StyleExtractionResult;

/// Shear angles tried by the slant sweep, in degrees
const SHEAR_SWEEP: std::ops::RangeInclusive<i32> = -20..=20;
const SHEAR_STEP: usize = 5;

/// Coverage is scaled by this to approximate stroke width in pixels
const STROKE_SCALE: f32 = 100.0;
const STROKE_RANGE: (f32, f32) = (1.0, 5.0);

const SPACING_RANGE: (f32, f32) = (2.0, 40.0);
/// Spacing reported when no row has two separate ink runs
const DEFAULT_SPACING: f32 = 10.0;

/// Analyze an encoded sample image.
///
/// Never fails: undecodable or blank samples yield
/// [`StyleExtractionResult::NEUTRAL`].
pub fn extract_style(bytes: &[u8]) -> StyleExtractionResult {
    match try_extract_style(bytes) {
        Ok(result) => result,
        Err(ExtractError::NoInk) => {
            tracing::debug!("Sample has no ink, using neutral style");
            StyleExtractionResult::NEUTRAL
        }
        Err(e) => {
            tracing::warn!("Style extraction failed: {}", e);
            StyleExtractionResult::NEUTRAL
        }
    }
}

/// Analyze an encoded sample image, surfacing decode failures and blank
/// samples as errors
pub fn try_extract_style(bytes: &[u8]) -> Result<StyleExtractionResult> {
    let image = image::load_from_memory(bytes)?;
    analyze_image(&image)
}

/// Analyze a decoded sample image
pub fn analyze_image(image: &DynamicImage) -> Result<StyleExtractionResult> {
    analyze_mask(&InkMask::from_image(image))
}

/// Analyze an already binarized sample
pub fn analyze_mask(mask: &InkMask) -> Result<StyleExtractionResult> {
    let total = (mask.width() as usize) * (mask.height() as usize);
    if mask.ink_count() == 0 || total == 0 {
        return Err(ExtractError::NoInk);
    }

    let deskew = estimate_deskew(mask);
    let stroke_width = (mask.coverage() * STROKE_SCALE).clamp(STROKE_RANGE.0, STROKE_RANGE.1);
    let messiness = (deskew.abs() / 30.0 + 0.1).min(1.0);

    let result = StyleExtractionResult {
        deskew_angle: deskew,
        slant: -deskew,
        stroke_width,
        avg_spacing: estimate_spacing(mask),
        messiness,
    };
    tracing::debug!("Extracted style: {:?}", result);
    Ok(result)
}

/// The sweep angle whose shear makes ink columns most uneven.
///
/// Upright strokes pile into few columns, so the angle that undoes the
/// writing's lean maximizes the variance of the column histogram. Ties keep
/// the earliest angle; a histogram with no variance reports 0.
pub fn estimate_deskew(mask: &InkMask) -> f32 {
    let mut best_angle = 0;
    let mut best_variance = 0.0;

    for angle in SHEAR_SWEEP.step_by(SHEAR_STEP) {
        let variance = column_variance(mask, angle as f32);
        if variance > best_variance {
            best_variance = variance;
            best_angle = angle;
        }
    }

    best_angle as f32
}

/// Variance of the ink histogram over columns after shearing by `degrees`.
///
/// Each ink pixel moves to `x - y·tan(angle)`; pixels sheared off the canvas
/// are dropped.
pub fn column_variance(mask: &InkMask, degrees: f32) -> f64 {
    let width = mask.width() as usize;
    if width == 0 {
        return 0.0;
    }
    let tan = (degrees as f64).to_radians().tan();
    let mut columns = vec![0u32; width];

    for (x, y) in mask.ink_pixels() {
        let sheared = (x as f64 - y as f64 * tan).round();
        if sheared >= 0.0 && (sheared as usize) < width {
            columns[sheared as usize] += 1;
        }
    }

    let n = width as f64;
    let mean = columns.iter().map(|&c| c as f64).sum::<f64>() / n;
    columns.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / n
}

/// Mean width of the background gaps between ink runs along rows
pub fn estimate_spacing(mask: &InkMask) -> f32 {
    let gaps = mask.row_gaps();
    if gaps.is_empty() {
        return DEFAULT_SPACING;
    }
    let mean = gaps.iter().map(|&g| g as f32).sum::<f32>() / gaps.len() as f32;
    mean.clamp(SPACING_RANGE.0, SPACING_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ANALYSIS_SIZE;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Vertical 3px strokes leaning right by `lean` degrees (tops to the right)
    fn leaning_strokes(lean: f32) -> InkMask {
        let tan = lean.to_radians().tan();
        let (top, bottom) = (60u32, 450u32);
        InkMask::from_fn(ANALYSIS_SIZE, ANALYSIS_SIZE, |x, y| {
            if y < top || y >= bottom {
                return false;
            }
            let offset = ((bottom - y) as f32 * tan).round() as i64;
            (0..6).any(|i| {
                let x0 = 150 + i * 40 + offset;
                (x0..x0 + 3).contains(&(x as i64))
            })
        })
    }

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_upright_strokes_have_no_slant() {
        let result = analyze_mask(&leaning_strokes(0.0)).unwrap();
        assert_eq!(result.deskew_angle, 0.0);
        assert_eq!(result.slant, 0.0);
        assert!((result.messiness - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_known_shear_is_recovered() {
        for lean in [-15.0f32, -10.0, 5.0, 10.0, 20.0] {
            let deskew = estimate_deskew(&leaning_strokes(lean));
            assert!(
                (deskew - -lean).abs() <= 5.0,
                "lean {} reported deskew {}",
                lean,
                deskew
            );
        }
    }

    #[test]
    fn test_slant_sign_convention() {
        let result = analyze_mask(&leaning_strokes(10.0)).unwrap();
        assert!(result.slant > 0.0, "right lean should report positive slant");
        assert_eq!(result.slant, -result.deskew_angle);
        assert!(result.messiness > 0.1 && result.messiness <= 1.0);
    }

    #[test]
    fn test_stroke_width_clamped() {
        let sparse = InkMask::from_fn(100, 100, |x, y| x == 0 && y == 0);
        assert_eq!(analyze_mask(&sparse).unwrap().stroke_width, 1.0);

        let dense = InkMask::from_fn(100, 100, |x, _| x % 2 == 0);
        assert_eq!(analyze_mask(&dense).unwrap().stroke_width, 5.0);
    }

    #[test]
    fn test_spacing_from_row_gaps() {
        let mask = InkMask::from_fn(100, 10, |x, _| x % 12 == 0);
        assert_eq!(estimate_spacing(&mask), 11.0);

        let single = InkMask::from_fn(100, 10, |x, _| x == 5);
        assert_eq!(estimate_spacing(&single), DEFAULT_SPACING);
    }

    #[test]
    fn test_blank_sample_is_neutral() {
        let blank = RgbImage::from_pixel(200, 100, Rgb([250, 250, 250]));
        assert_eq!(extract_style(&png_bytes(blank.clone())), StyleExtractionResult::NEUTRAL);
        assert!(matches!(try_extract_style(&png_bytes(blank)), Err(ExtractError::NoInk)));
    }

    #[test]
    fn test_undecodable_sample_is_neutral() {
        let garbage = b"definitely not an image";
        assert_eq!(extract_style(garbage), StyleExtractionResult::NEUTRAL);
        assert!(matches!(try_extract_style(garbage), Err(ExtractError::Decode(_))));
    }

    #[test]
    fn test_encoded_sample_round_trip() {
        let mut img = RgbImage::from_pixel(ANALYSIS_SIZE, ANALYSIS_SIZE, Rgb([255, 255, 255]));
        for y in 100..400 {
            for x in [150u32, 151, 300, 301] {
                img.put_pixel(x, y, Rgb([20, 20, 30]));
            }
        }
        let result = extract_style(&png_bytes(img));
        assert_eq!(result.deskew_angle, 0.0);
        // The 148px gap between the strokes is clamped
        assert_eq!(result.avg_spacing, 40.0);
    }
}
