//! Interactive teach flow: present candidate silhouettes, let the
//! operator pick one by color key, track it across frames while the
//! operator decides, and commit it to the object store on confirmation.
//!
//! The session state is an explicit value passed through `Learner::step`
//! rather than ambient mutable fields, so the transition table is
//! testable without a live camera.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, warn};

use crate::{
    algorithms::descriptor::describe,
    error::{Error, Result},
    frame::{DepthFrame, FrameGate},
    overlay,
    pipeline::ExtractionPipeline,
    store::{LearnedObject, ObjectStore},
    traits::{FrameSource, KeySource, NameSource, OverlaySink, SilhouetteMatcher},
    types::Silhouette,
};

/// Confirms saving the tracked object.
pub const CONFIRM_KEY: char = 'y';
/// Rejects the tracked object and returns to candidate selection.
pub const REJECT_KEY: char = 'n';

/// Most recent operator key per poll, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    None,
    Char(char),
    Escape,
}

/// One selectable candidate slot: shortcut key, human label, and the
/// overlay color the candidate is drawn in. The bindings form an
/// explicit ordered list; candidate *i* answers to shortcut *i*.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBinding {
    pub shortcut: char,
    pub label: String,
    pub color: [u8; 3],
}

impl LabelBinding {
    /// The default candidate slots. The original color set also carried
    /// yellow, but its `'y'` shortcut is the confirm key; it is omitted
    /// rather than silently shadowed.
    pub fn default_set() -> Vec<LabelBinding> {
        vec![
            LabelBinding {
                shortcut: 'b',
                label: "blue".into(),
                color: [0, 0, 255],
            },
            LabelBinding {
                shortcut: 'p',
                label: "pink".into(),
                color: [255, 0, 255],
            },
            LabelBinding {
                shortcut: 'r',
                label: "red".into(),
                color: [255, 0, 0],
            },
        ]
    }
}

/// The candidate captured in `FindObjects`, carried through tracking
/// and saving with its originally computed descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    pub silhouette: Silhouette,
    pub angle: f64,
    pub center: (f64, f64),
}

/// Teach-flow phase. `TrackObject` loops back to `Start` on rejection.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LearnerState {
    Start,
    FindObjects,
    TrackObject(TrackedObject),
    SaveObject(TrackedObject),
}

/// Best match of the tracked silhouette in the current frame, with a
/// freshly computed descriptor for the live overlay. Display-only; the
/// captured reference descriptor is never overwritten by tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMatch {
    pub index: usize,
    pub score: f64,
    pub angle: f64,
    pub center: (f64, f64),
}

/// Outcome of one frame step: the next state plus what tracking matched
/// this frame, if anything.
#[derive(Debug)]
pub struct LearnerStep {
    pub state: LearnerState,
    pub matched: Option<TrackMatch>,
}

/// Pure transition logic of the teach flow.
pub struct Learner {
    bindings: Vec<LabelBinding>,
    matcher: Box<dyn SilhouetteMatcher>,
}

impl Learner {
    pub fn new(bindings: Vec<LabelBinding>, matcher: Box<dyn SilhouetteMatcher>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::Config("at least one label binding is required".into()));
        }
        for (i, binding) in bindings.iter().enumerate() {
            if binding.label.trim().is_empty() {
                return Err(Error::Config(format!("binding {i} has an empty label")));
            }
            if binding.shortcut == CONFIRM_KEY || binding.shortcut == REJECT_KEY {
                return Err(Error::Config(format!(
                    "shortcut '{}' for label '{}' collides with a reserved key",
                    binding.shortcut, binding.label
                )));
            }
            if bindings[..i].iter().any(|b| b.shortcut == binding.shortcut) {
                return Err(Error::Config(format!(
                    "duplicate shortcut '{}'",
                    binding.shortcut
                )));
            }
        }
        Ok(Self { bindings, matcher })
    }

    pub fn bindings(&self) -> &[LabelBinding] {
        &self.bindings
    }

    /// Advance the state machine by one frame tick. `candidates` are the
    /// current frame's silhouettes in extraction order; `key` is the
    /// operator key observed this tick. Unrecognized keys (and the
    /// absence of a key) never change state.
    pub fn step(
        &self,
        state: LearnerState,
        candidates: &[Silhouette],
        key: KeyPress,
    ) -> LearnerStep {
        match state {
            LearnerState::Start => {
                info!("press any of the following keys to save the respective object:");
                let menu = self
                    .bindings
                    .iter()
                    .map(|b| format!("'{}' for {};", b.shortcut, b.label))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!("{menu}");
                LearnerStep {
                    state: LearnerState::FindObjects,
                    matched: None,
                }
            }

            LearnerState::FindObjects => {
                if let KeyPress::Char(c) = key {
                    if let Some(index) = self.bindings.iter().position(|b| b.shortcut == c) {
                        if let Some(candidate) = candidates.get(index) {
                            let captured = describe(candidate);
                            info!(
                                label = %self.bindings[index].label,
                                "tracking the selected object; save it? (y/n)"
                            );
                            return LearnerStep {
                                state: LearnerState::TrackObject(TrackedObject {
                                    silhouette: candidate.clone(),
                                    angle: captured.angle,
                                    center: captured.centroid,
                                }),
                                matched: None,
                            };
                        }
                    }
                }
                LearnerStep {
                    state: LearnerState::FindObjects,
                    matched: None,
                }
            }

            LearnerState::TrackObject(tracked) => {
                let matched = self
                    .matcher
                    .find_best_match(&tracked.silhouette, candidates)
                    .map(|m| {
                        let live = describe(&candidates[m.index]);
                        debug!(score = m.score, index = m.index, "tracking match");
                        TrackMatch {
                            index: m.index,
                            score: m.score,
                            angle: live.angle,
                            center: live.centroid,
                        }
                    });

                let state = match key {
                    KeyPress::Char(c) if c == REJECT_KEY => {
                        info!("tracked object discarded");
                        LearnerState::Start
                    }
                    KeyPress::Char(c) if c == CONFIRM_KEY => LearnerState::SaveObject(tracked),
                    _ => LearnerState::TrackObject(tracked),
                };
                LearnerStep { state, matched }
            }

            // Saving needs the name prompt and the store; the session
            // owns those, so the step passes the state through.
            LearnerState::SaveObject(tracked) => LearnerStep {
                state: LearnerState::SaveObject(tracked),
                matched: None,
            },
        }
    }
}

/// Tunables of the interactive loop.
#[derive(Debug, Clone)]
pub struct LearnSessionConfig {
    /// Bounded operator key wait per frame tick.
    pub key_wait: Duration,
    /// Minimum interval between processed frames; earlier arrivals are
    /// dropped at the frame boundary.
    pub frame_interval: Duration,
    /// Overlay color of the tracked match.
    pub tracking_color: [u8; 3],
    /// Overlay color of the tracked match's center marker.
    pub center_color: [u8; 3],
}

impl Default for LearnSessionConfig {
    fn default() -> Self {
        Self {
            key_wait: Duration::from_millis(500),
            frame_interval: Duration::from_secs(1),
            tracking_color: [0, 255, 0],
            center_color: [255, 0, 0],
        }
    }
}

/// The end-to-end teach loop: frames in, learned objects out. Drives the
/// pure `Learner` transitions with real collaborators, one frame at a
/// time; the operator's Escape ends the session from any state.
pub struct LearnSession<F, K, O, N>
where
    F: FrameSource,
    K: KeySource,
    O: OverlaySink,
    N: NameSource,
{
    learner: Learner,
    pipeline: ExtractionPipeline,
    store: ObjectStore,
    frames: F,
    keys: K,
    overlay: O,
    names: N,
    gate: FrameGate,
    config: LearnSessionConfig,
    state: LearnerState,
}

impl<F, K, O, N> LearnSession<F, K, O, N>
where
    F: FrameSource,
    K: KeySource,
    O: OverlaySink,
    N: NameSource,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        learner: Learner,
        pipeline: ExtractionPipeline,
        store: ObjectStore,
        frames: F,
        keys: K,
        overlay: O,
        names: N,
        config: LearnSessionConfig,
    ) -> Self {
        let gate = FrameGate::new(config.frame_interval);
        Self {
            learner,
            pipeline,
            store,
            frames,
            keys,
            overlay,
            names,
            gate,
            config,
            state: LearnerState::Start,
        }
    }

    pub fn state(&self) -> &LearnerState {
        &self.state
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn run(&mut self) -> Result<()> {
        info!("learn session started");
        while let Some(frame) = self.frames.next_frame()? {
            if !self.gate.admit(Instant::now()) {
                continue;
            }
            if let ControlFlow::Break(()) = self.tick(frame)? {
                break;
            }
        }
        info!("learn session ended");
        Ok(())
    }

    fn tick(&mut self, frame: DepthFrame) -> Result<ControlFlow<()>> {
        let image = match frame.to_intensity() {
            Ok(image) => image,
            Err(err) => {
                warn!(%err, "frame conversion failed, skipping frame");
                return Ok(ControlFlow::Continue(()));
            }
        };
        let candidates = self.pipeline.candidates(&image)?;

        let key = self.keys.poll(self.config.key_wait);
        if key == KeyPress::Escape {
            info!("operator quit");
            return Ok(ControlFlow::Break(()));
        }

        let mut state = std::mem::replace(&mut self.state, LearnerState::Start);
        if matches!(state, LearnerState::Start) {
            // Announcement falls through to candidate display in the
            // same tick.
            state = self.learner.step(state, &candidates, KeyPress::None).state;
        }
        let step = self.learner.step(state, &candidates, key);
        debug!(state = %step.state, candidates = candidates.len(), "tick");

        let mut canvas = overlay::to_canvas(&image);
        match &step.state {
            LearnerState::FindObjects => {
                for (binding, candidate) in
                    self.learner.bindings().iter().zip(candidates.iter())
                {
                    overlay::draw_silhouette(&mut canvas, candidate, binding.color);
                }
            }
            LearnerState::TrackObject(_) | LearnerState::SaveObject(_) => {
                if let Some(m) = &step.matched {
                    overlay::draw_silhouette(
                        &mut canvas,
                        &candidates[m.index],
                        self.config.tracking_color,
                    );
                    overlay::draw_center(&mut canvas, m.center, self.config.center_color);
                }
            }
            LearnerState::Start => {}
        }
        self.overlay.present(&canvas)?;

        self.state = match step.state {
            LearnerState::SaveObject(tracked) => {
                self.save_tracked(tracked)?;
                LearnerState::Start
            }
            other => other,
        };
        Ok(ControlFlow::Continue(()))
    }

    /// Prompt until the operator supplies a non-empty name, then persist
    /// the tracked object with its originally captured descriptor.
    fn save_tracked(&mut self, tracked: TrackedObject) -> Result<()> {
        let name = loop {
            let raw = self.names.read_name()?;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("object name must not be empty, asking again");
                continue;
            }
            break trimmed.to_string();
        };
        info!(name = %name, "saving object");
        let object = LearnedObject::new(
            name,
            tracked.silhouette,
            tracked.angle,
            [tracked.center.0, tracked.center.1],
        )?;
        self.store.save(object)
    }
}
