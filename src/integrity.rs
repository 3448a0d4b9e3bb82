//! Image-file integrity checks

use std::path::{Path, PathBuf};

use imageproc::image;

/// Return the paths whose content does not open and decode as an image.
///
/// Unreadable files count as corrupt. Order follows the input; healthy
/// files are dropped.
pub fn find_corrupt<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match image::open(path) {
                Ok(_) => None,
                Err(e) => {
                    log::debug!("{} failed integrity check: {e}", path.display());
                    Some(path.to_path_buf())
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::image::{ImageFormat, Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn flags_undecodable_and_missing_files_in_order() {
        let dir = TempDir::new().unwrap();

        let good = dir.path().join("good.png");
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
            .save_with_format(&good, ImageFormat::Png)
            .unwrap();

        let truncated = dir.path().join("truncated.png");
        fs::write(&truncated, &fs::read(&good).unwrap()[..10]).unwrap();

        let text = dir.path().join("notes.txt");
        fs::write(&text, b"just text").unwrap();

        let missing = dir.path().join("missing.png");

        let corrupt = find_corrupt(&[good, truncated.clone(), text.clone(), missing.clone()]);
        assert_eq!(corrupt, vec![truncated, text, missing]);
    }

    #[test]
    fn all_healthy_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert!(find_corrupt(&[path]).is_empty());
    }
}
