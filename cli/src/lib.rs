pub mod sources;

use std::fs;
use std::path::Path;

use serde::Deserialize;
use silhouette::{
    ExtractionPipeline, GaussianBlurPreprocessor, ImageprocContourExtractor, LabelBinding,
    ThresholdPreprocessor,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
    #[error("No frame images found in {0}")]
    NoFrames(String),
}

/// Settings for both the learn and recognize flows, loadable from a
/// TOML or JSON file. Everything has a usable default, so running
/// without a config file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Object store file, shared by learn (write) and recognize (read).
    pub store_path: String,
    /// Ordered candidate slots for the teach flow.
    pub labels: Vec<LabelBinding>,
    /// Binarization cutoff applied before boundary tracing.
    pub threshold: u8,
    /// Optional Gaussian blur ahead of thresholding.
    pub blur_sigma: Option<f32>,
    /// Trace outer boundaries only, skipping holes.
    pub external_only: bool,
    /// Minimum milliseconds between processed frames in the teach flow.
    pub frame_interval_ms: u64,
    /// Bounded operator key wait per tick, in milliseconds.
    pub key_wait_ms: u64,
    /// Recognition dissimilarity ceiling; higher accepts looser matches.
    pub max_dissimilarity: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: "objects.json".to_string(),
            labels: LabelBinding::default_set(),
            threshold: 128,
            blur_sigma: None,
            external_only: false,
            frame_interval_ms: 1000,
            key_wait_ms: 500,
            max_dissimilarity: 0.3,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&contents)?),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Assemble the extraction pipeline these settings describe.
    pub fn pipeline(&self) -> ExtractionPipeline {
        let mut builder = ExtractionPipeline::builder();
        if let Some(sigma) = self.blur_sigma {
            builder = builder.add_preprocessor(GaussianBlurPreprocessor { sigma });
        }
        builder
            .add_preprocessor(ThresholdPreprocessor {
                threshold: self.threshold,
            })
            .set_extractor(ImageprocContourExtractor {
                external_only: self.external_only,
            })
            .build()
    }
}
