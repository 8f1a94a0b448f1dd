//! # Silhouette teaching & recognition
//!
//! Teaches a depth-camera vision pipeline to recognize a physical object
//! by its silhouette, then re-detects that silhouette in later frames.
//! The core is the shape-matching and interactive-learning state
//! machine: extracting candidate silhouettes from a depth image, scoring
//! them against a learned reference with a rotation/translation/scale
//! invariant dissimilarity, and deriving a stable pose summary (center +
//! orientation angle) for the match.
//!
//! Camera drivers, display windows, keyboards and result transports are
//! collaborator traits (`FrameSource`, `KeySource`, `OverlaySink`,
//! `NameSource`, `RecognitionSink`); the `cli` crate ships file- and
//! terminal-backed implementations.
//!
//! ## Teaching
//!
//! ```rust,no_run
//! use silhouette::{
//!     ExtractionPipeline, HuMomentMatcher, LabelBinding, LearnSession,
//!     LearnSessionConfig, Learner, ObjectStore,
//! };
//! # use silhouette::{DepthFrame, KeyPress, overlay::DiscardOverlay};
//! # use std::time::Duration;
//! # struct Camera;
//! # impl silhouette::FrameSource for Camera {
//! #     fn next_frame(&mut self) -> silhouette::Result<Option<DepthFrame>> { Ok(None) }
//! # }
//! # struct Keyboard;
//! # impl silhouette::KeySource for Keyboard {
//! #     fn poll(&mut self, _wait: Duration) -> KeyPress { KeyPress::None }
//! # }
//! # struct Prompt;
//! # impl silhouette::NameSource for Prompt {
//! #     fn read_name(&mut self) -> silhouette::Result<String> { Ok("cube".into()) }
//! # }
//!
//! # fn main() -> silhouette::Result<()> {
//! let learner = Learner::new(LabelBinding::default_set(), Box::new(HuMomentMatcher))?;
//! let mut session = LearnSession::new(
//!     learner,
//!     ExtractionPipeline::builder().build(),
//!     ObjectStore::load("objects.json"),
//!     Camera,
//!     Keyboard,
//!     DiscardOverlay,
//!     Prompt,
//!     LearnSessionConfig::default(),
//! );
//! session.run()?;
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod error;
pub mod frame;
pub mod learner;
pub mod overlay;
pub mod pipeline;
pub mod recognizer;
pub mod store;
pub mod traits;
pub mod types;

pub use algorithms::{
    Boundary, BoundaryRank, GaussianBlurPreprocessor, HuMomentMatcher,
    ImageprocContourExtractor, MatchResult, ThresholdPreprocessor,
};
pub use error::{Error, Result};
pub use frame::{DepthFrame, FrameGate};
pub use learner::{
    KeyPress, LabelBinding, LearnSession, LearnSessionConfig, Learner, LearnerState,
    TrackedObject, CONFIRM_KEY, REJECT_KEY,
};
pub use pipeline::{ExtractionPipeline, ExtractionPipelineBuilder};
pub use recognizer::{RecognizeSession, Recognition, Recognizer};
pub use store::{LearnedObject, ObjectStore};
pub use traits::{
    ContourExtractor, FrameSource, ImagePreprocessor, KeySource, NameSource, OverlaySink,
    RecognitionSink, SilhouetteMatcher,
};
pub use types::{ShapeDescriptor, Silhouette};
