//! Bounding-box annotation

use std::sync::OnceLock;

use ab_glyph::{FontRef, PxScale};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::image::Rgb;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::BgrImage;

/// Box and caption color, BGR red.
const ANNOTATION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Caption glyph height in pixels.
const CAPTION_PX: f32 = 20.0;
/// Gap between the caption and the box top edge.
const CAPTION_GAP: i32 = 2;

static CAPTION_FONT: OnceLock<FontRef<'static>> = OnceLock::new();

fn caption_font() -> &'static FontRef<'static> {
    CAPTION_FONT.get_or_init(|| {
        FontRef::try_from_slice(include_bytes!("../assets/DejaVuSans.ttf"))
            .expect("embedded caption font is valid")
    })
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    #[error("boxes, labels, and scores must have equal lengths, got {boxes}/{labels}/{scores}")]
    LengthMismatch {
        boxes: usize,
        labels: usize,
        scores: usize,
    },
}

/// A detection box in normalized center/size coordinates.
///
/// `cx`, `cy` locate the box center and `width`, `height` its extent, all as
/// fractions of the image dimensions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    /// Pixel-space corners `(x0, y0, x1, y1)` for an image of the given size.
    fn corners(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        let (w, h) = (width as f32, height as f32);
        let x0 = ((self.cx - self.width / 2.0) * w) as i32;
        let y0 = ((self.cy - self.height / 2.0) * h) as i32;
        let x1 = ((self.cx + self.width / 2.0) * w) as i32;
        let y1 = ((self.cy + self.height / 2.0) * h) as i32;
        (x0, y0, x1, y1)
    }
}

/// Draw one rectangle and one `label_score` caption per box onto a copy of
/// `image`.
///
/// The three slices are parallel and must have equal lengths; nothing is
/// drawn when they do not. Boxes reaching outside the canvas are clipped by
/// the drawing primitives.
pub fn draw_boxes(
    image: &BgrImage,
    boxes: &[BoundingBox],
    labels: &[&str],
    scores: &[f32],
) -> Result<BgrImage, DrawError> {
    if boxes.len() != labels.len() || labels.len() != scores.len() {
        return Err(DrawError::LengthMismatch {
            boxes: boxes.len(),
            labels: labels.len(),
            scores: scores.len(),
        });
    }

    let (height, width) = image.dimensions();
    // Channel order stays BGR inside the buffer, so colors are BGR too.
    let mut canvas = image.to_raw_buffer();

    // Stroke weight scales with the image size.
    let thickness = (0.002 * (width + height) as f32 / 2.0).round() as i32 + 1;
    let font = caption_font();

    for ((bbox, label), score) in boxes.iter().zip(labels).zip(scores) {
        let (x0, y0, x1, y1) = bbox.corners(width as u32, height as u32);

        // Nested one-pixel outlines build up the stroke.
        for inset in 0..thickness {
            let w = (x1 - x0) - 2 * inset;
            let h = (y1 - y0) - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x0 + inset, y0 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, ANNOTATION_COLOR);
        }

        let caption = format!("{label}_{score:.2}");
        let text_y = y0 - CAPTION_PX as i32 - CAPTION_GAP;
        draw_text_mut(
            &mut canvas,
            ANNOTATION_COLOR,
            x0,
            text_y,
            PxScale::from(CAPTION_PX),
            font,
            &caption,
        );
    }

    Ok(BgrImage::from_raw_buffer(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::RgbImage;

    fn white_image(width: u32, height: u32) -> BgrImage {
        BgrImage::from_dynamic(&RgbImage::from_pixel(width, height, Rgb([255, 255, 255])).into())
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let img = white_image(32, 32);
        let boxes = [BoundingBox::new(0.5, 0.5, 0.5, 0.5)];

        let err = draw_boxes(&img, &boxes, &["cat", "dog"], &[0.9]).unwrap_err();
        assert_eq!(
            err,
            DrawError::LengthMismatch {
                boxes: 1,
                labels: 2,
                scores: 1,
            }
        );
    }

    #[test]
    fn draws_box_perimeter_in_red() {
        let img = white_image(64, 64);
        let boxes = [BoundingBox::new(0.5, 0.5, 0.5, 0.5)];

        let out = draw_boxes(&img, &boxes, &["cat"], &[0.9]).unwrap();
        assert_eq!(out.dimensions(), (64, 64));

        // Box spans x,y in [16, 48); the top edge runs along y = 16.
        let arr = out.as_array();
        assert_eq!(arr[[16, 20, 0]], 0);
        assert_eq!(arr[[16, 20, 1]], 0);
        assert_eq!(arr[[16, 20, 2]], 255);

        // Interior pixels keep their original color.
        assert_eq!(arr[[32, 32, 0]], 255);
        assert_eq!(arr[[32, 32, 1]], 255);
        assert_eq!(arr[[32, 32, 2]], 255);
    }

    #[test]
    fn caption_pixels_appear_above_box() {
        let img = white_image(200, 200);
        let boxes = [BoundingBox::new(0.5, 0.5, 0.4, 0.4)];

        let out = draw_boxes(&img, &boxes, &["person"], &[0.87]).unwrap();
        let arr = out.as_array();

        // Some pixel in the caption band must have been tinted.
        let band_touched = (38..60).any(|y| {
            (60..180).any(|x| {
                arr[[y, x, 0]] != 255 || arr[[y, x, 1]] != 255 || arr[[y, x, 2]] != 255
            })
        });
        assert!(band_touched);
    }

    #[test]
    fn input_image_is_not_mutated() {
        let img = white_image(32, 32);
        let before = img.clone();
        let boxes = [BoundingBox::new(0.5, 0.5, 0.5, 0.5)];

        let _ = draw_boxes(&img, &boxes, &["x"], &[0.5]).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn no_boxes_is_a_no_op() {
        let img = white_image(16, 16);
        let out = draw_boxes(&img, &[], &[], &[]).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn out_of_range_box_is_clipped_not_rejected() {
        let img = white_image(32, 32);
        let boxes = [BoundingBox::new(0.0, 0.0, 1.0, 1.0)];
        assert!(draw_boxes(&img, &boxes, &["edge"], &[0.1]).is_ok());
    }

    #[test]
    fn bounding_box_parses_from_json() {
        let bbox: BoundingBox =
            serde_json::from_str(r#"{"cx":0.61,"cy":0.64,"width":0.12,"height":0.20}"#).unwrap();
        assert!((bbox.cx - 0.61).abs() < 1e-6);
        assert!((bbox.height - 0.20).abs() < 1e-6);
    }
}
