pub mod decode;
pub mod download;
pub mod submitter;

pub use decode::{decode_image_reference, png_fallback, DecodedImage};
pub use download::download_file_name;
pub use submitter::{LoadedImage, SubmitterClient};
