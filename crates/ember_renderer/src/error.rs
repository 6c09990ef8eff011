use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a scene or writing its image.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load texture {}: {source}", .path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("render cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
