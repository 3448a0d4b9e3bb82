pub mod dedup;
pub mod draw;
pub mod image;
pub mod integrity;
pub mod loader;
pub mod tensor;

// Re-export commonly used types
pub use dedup::{find_duplicates, find_duplicates_against};
pub use draw::{draw_boxes, BoundingBox, DrawError};
pub use image::BgrImage;
pub use integrity::find_corrupt;
pub use loader::{load_image, ImageRequest, LoadError, DEFAULT_URL_TIMEOUT};
pub use tensor::{denormalize, TensorError, IMAGENET_MEAN, IMAGENET_STD};
