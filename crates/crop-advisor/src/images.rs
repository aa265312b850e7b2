//! Crop Image Lookup

use predictor_client::Prediction;
use std::path::{Path, PathBuf};

/// Extensions tried, in order
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Result of looking up an illustrative image for a prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    Found(PathBuf),
    /// No `<crop>.jpg` or `<crop>.jpeg` in the image directory
    Missing { crop: String },
    /// The prediction label was blank
    NoCrop,
}

/// Look up `<dir>/<first token>.jpg`, then `.jpeg`
///
/// Labels sharing a first word map to the same image.
pub fn find_crop_image(dir: &Path, prediction: &Prediction) -> ImageLookup {
    let Some(crop) = prediction.crop() else {
        return ImageLookup::NoCrop;
    };

    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", crop, ext)))
        .find(|path| path.exists())
        .map(ImageLookup::Found)
        .unwrap_or_else(|| ImageLookup::Missing {
            crop: crop.to_string(),
        })
}
