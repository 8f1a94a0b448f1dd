use std::time::Duration;

use image::{GrayImage, RgbImage};

use crate::{
    algorithms::extraction::Boundary,
    algorithms::matching::MatchResult,
    error::Result,
    frame::DepthFrame,
    learner::KeyPress,
    recognizer::Recognition,
    types::Silhouette,
};

/// Trait for image preprocessing stages (blur, threshold).
pub trait ImagePreprocessor: Send + Sync {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for boundary-tracing contour extraction. Implementations must
/// preserve discovery order and apply no minimum-size filtering beyond
/// dropping traces too short to form a valid silhouette.
pub trait ContourExtractor: Send + Sync {
    fn extract(&self, image: &GrayImage) -> Result<Vec<Boundary>>;
}

/// Trait for scoring a reference silhouette against frame candidates.
pub trait SilhouetteMatcher: Send + Sync {
    /// Return the lowest-dissimilarity candidate, or `None` for an empty
    /// candidate list. Ties resolve to the first candidate by input
    /// order. Threshold-based rejection is caller policy.
    fn find_best_match(
        &self,
        reference: &Silhouette,
        candidates: &[Silhouette],
    ) -> Option<MatchResult>;
}

// Collaborator seams: camera, keyboard, display and result transport
// stay outside the core. The CLI crate provides file/terminal-backed
// implementations; tests provide scripted ones.

/// Delivers depth frames at source rate; `None` means the stream ended.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<DepthFrame>>;
}

/// Delivers the most recent operator key within a bounded wait.
pub trait KeySource {
    fn poll(&mut self, wait: Duration) -> KeyPress;
}

/// Receives an RGB frame with drawn contours/markers for inspection.
pub trait OverlaySink {
    fn present(&mut self, frame: &RgbImage) -> Result<()>;
}

/// Blocks for an operator-supplied object name.
pub trait NameSource {
    fn read_name(&mut self) -> Result<String>;
}

/// Receives recognition results on the recognition side.
pub trait RecognitionSink {
    fn publish(&mut self, recognitions: &[Recognition]) -> Result<()>;
}
