pub mod descriptor;
pub mod extraction;
pub mod matching;
pub mod moments;
pub mod preprocessing;

pub use descriptor::{angle, center, describe};
pub use extraction::{Boundary, BoundaryRank, ImageprocContourExtractor};
pub use matching::{HuMomentMatcher, MatchResult};
pub use preprocessing::{GaussianBlurPreprocessor, ThresholdPreprocessor};
