//! Domain types and state machines for the EcoSort assistant.
//!
//! Everything in this crate is plain data and pure transitions: the canned
//! analysis catalogue behind the [`analysis::AnalysisProvider`] trait, the
//! disposal [`verification::VerificationFlow`] state machine, the weekly
//! collection [`schedule`], reward policy and the reward modal's
//! [`anim::RewardTimeline`]. No engine types, no I/O; the front end maps
//! these onto its own resources and systems.

pub mod analysis;
pub mod anim;
pub mod capture;
pub mod disposal;
pub mod profile;
pub mod reward;
pub mod schedule;
pub mod verification;

pub use analysis::{AnalysisError, AnalysisProvider, AnalysisResult, CannedAnalysis, FixedAnalysis};
pub use capture::{CaptureError, CaptureRef, CaptureSource};
pub use reward::{Achievement, RewardEvent};
pub use schedule::{ScheduleEntry, Tone, Weekday, schedule_for};
pub use verification::{VerificationFlow, VerificationOutcome, VerificationPhase};
