use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid silhouette: {0} distinct points, need at least 3")]
    DegenerateSilhouette(usize),

    #[error("malformed depth frame: {width}x{height} declared, {samples} samples supplied")]
    FrameSize {
        width: u32,
        height: u32,
        samples: usize,
    },

    #[error("depth frame conversion failed: {0}")]
    FrameConversion(String),

    #[error("object name must not be empty")]
    EmptyName,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
