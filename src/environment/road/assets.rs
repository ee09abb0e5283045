use std::path::{Path, PathBuf};

use anyhow::Result;
use image::imageops::{self, FilterType};
use lazy_static::lazy_static;

use crate::environment::road::collision_field::{CollisionField, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::ql::prelude::QlError;

#[rustfmt::skip]
lazy_static! {
    pub static ref ROAD_IMAGE_PATH: PathBuf = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("images/road.png");
}

/// Loads the road texture, scales it to the viewport and derives the collision field from it.
///
/// Scaling uses nearest-neighbor sampling, so wall pixels keep their exact color.
pub fn load_road_field(path: &Path) -> Result<CollisionField> {
    let image = image::open(path)
        .map_err(|e| QlError::AssetLoadFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .to_rgba8();

    let image = if image.dimensions() == (VIEWPORT_WIDTH, VIEWPORT_HEIGHT) {
        image
    } else {
        log::debug!("scaling road image from {:?} to {}x{}", image.dimensions(), VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        imageops::resize(&image, VIEWPORT_WIDTH, VIEWPORT_HEIGHT, FilterType::Nearest)
    };

    log::info!("loaded road from '{}'", path.display());
    Ok(CollisionField::from_image(&image)?)
}
