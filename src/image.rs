//! BGR pixel buffers and decoding

use imageproc::image::{load_from_memory, DynamicImage, ImageError, Rgb, RgbImage};
use ndarray::Array3;

/// A decoded color image: `[height, width, channel]` bytes, channel order BGR.
///
/// Display and annotation tooling in this crate works in BGR; use
/// [`BgrImage::to_rgb`] when handing pixels to RGB-first consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct BgrImage(Array3<u8>);

impl BgrImage {
    pub fn height(&self) -> usize {
        self.0.dim().0
    }

    pub fn width(&self) -> usize {
        self.0.dim().1
    }

    /// `(height, width)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        let (h, w, _) = self.0.dim();
        (h, w)
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.0
    }

    pub fn into_array(self) -> Array3<u8> {
        self.0
    }

    /// True if every byte in the buffer is zero.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        let mut arr = Array3::<u8>::zeros((h, w, 3));

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            arr[[y, x, 0]] = pixel[2];
            arr[[y, x, 1]] = pixel[1];
            arr[[y, x, 2]] = pixel[0];
        }
        BgrImage(arr)
    }

    /// Convert to an RGB buffer, swapping the channel order.
    pub fn to_rgb(&self) -> RgbImage {
        let (h, w, _) = self.0.dim();
        RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            Rgb([self.0[[y, x, 2]], self.0[[y, x, 1]], self.0[[y, x, 0]]])
        })
    }

    /// Copy into an `RgbImage` buffer with the channel order left as-is.
    ///
    /// The pixels stay BGR; colors passed to drawing routines operating on
    /// the result must also be in BGR order.
    pub(crate) fn to_raw_buffer(&self) -> RgbImage {
        let (h, w, _) = self.0.dim();
        RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let (x, y) = (x as usize, y as usize);
            Rgb([self.0[[y, x, 0]], self.0[[y, x, 1]], self.0[[y, x, 2]]])
        })
    }

    /// Inverse of [`BgrImage::to_raw_buffer`]: no channel swap.
    pub(crate) fn from_raw_buffer(buf: RgbImage) -> Self {
        let (w, h) = (buf.width() as usize, buf.height() as usize);
        let arr = Array3::from_shape_vec((h, w, 3), buf.into_raw())
            .expect("pixel buffer length matches dimensions");
        BgrImage(arr)
    }
}

impl From<Array3<u8>> for BgrImage {
    fn from(arr: Array3<u8>) -> Self {
        BgrImage(arr)
    }
}

/// Decode encoded image bytes (JPEG, PNG, ...) into a BGR buffer.
pub fn decode(data: &[u8]) -> Result<BgrImage, ImageError> {
    let img = load_from_memory(data)?;
    Ok(BgrImage::from_dynamic(&img))
}
