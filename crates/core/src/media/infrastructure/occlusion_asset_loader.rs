use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compositing::domain::occlusion_image::OcclusionImage;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to load occlusion image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("occlusion image {path} has no pixels")]
    Empty { path: PathBuf },
}

/// Load overlay art for occlusion mode, keeping transparency when the file
/// has an alpha channel.
pub fn load_occlusion_image(path: &Path) -> Result<OcclusionImage, AssetError> {
    let img = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let occlusion = OcclusionImage::from_dynamic(img);
    if occlusion.is_empty() {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }
    log::info!(
        "Loaded occlusion image {} ({}x{}, {} channels)",
        path.display(),
        occlusion.width(),
        occlusion.height(),
        occlusion.channels()
    );
    Ok(occlusion)
}
