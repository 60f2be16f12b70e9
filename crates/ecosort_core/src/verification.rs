//! Disposal verification: a two-stage flow with an exactly-once outcome.

use crate::capture::CaptureRef;

/// Observable stage of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPhase {
    /// Showing instructions, waiting for a photo.
    Instruction,
    /// A photo is pending review.
    Captured,
}

/// What the caller receives when the user confirms.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub image: CaptureRef,
    pub location: String,
}

/// The verification state machine.
///
/// Holds at most one pending image. `confirm` is the only transition that
/// produces an outcome, and it consumes the pending image on the way out, so
/// a second confirm (double tap) observes `Instruction` and returns `None`.
#[derive(Debug, Default)]
pub struct VerificationFlow {
    pending: Option<CaptureRef>,
}

impl VerificationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> VerificationPhase {
        if self.pending.is_some() {
            VerificationPhase::Captured
        } else {
            VerificationPhase::Instruction
        }
    }

    pub fn pending(&self) -> Option<&CaptureRef> {
        self.pending.as_ref()
    }

    /// A capture finished. Replaces any pending image; re-entry never queues
    /// a second one.
    pub fn accept_capture(&mut self, image: CaptureRef) {
        self.pending = Some(image);
    }

    /// Discards the pending image so the caller can request a fresh capture.
    /// Returns whether there was anything to discard.
    pub fn retake(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Confirms the pending capture.
    ///
    /// Only valid from `Captured`; in any other phase this is a no-op that
    /// returns `None`.
    pub fn confirm(&mut self, location: impl Into<String>) -> Option<VerificationOutcome> {
        self.pending.take().map(|image| VerificationOutcome {
            image,
            location: location.into(),
        })
    }

    /// Abandons the flow without an outcome.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureSource;

    fn image(path: &str) -> CaptureRef {
        CaptureRef::new(path, CaptureSource::Camera)
    }

    #[test]
    fn confirm_without_capture_is_a_noop() {
        let mut flow = VerificationFlow::new();

        assert_eq!(flow.phase(), VerificationPhase::Instruction);
        assert!(flow.confirm("Seoul").is_none());
        assert_eq!(flow.phase(), VerificationPhase::Instruction);
    }

    #[test]
    fn confirm_emits_outcome_exactly_once() {
        let mut flow = VerificationFlow::new();
        flow.accept_capture(image("/tmp/1.jpg"));
        assert_eq!(flow.phase(), VerificationPhase::Captured);

        let outcome = flow.confirm("Yeoksam-dong");
        assert!(outcome.is_some());
        assert_eq!(outcome.unwrap().location, "Yeoksam-dong");

        // Double tap: second confirm observes Instruction and stays silent.
        assert!(flow.confirm("Yeoksam-dong").is_none());
        assert_eq!(flow.phase(), VerificationPhase::Instruction);
    }

    #[test]
    fn recapture_replaces_the_pending_image() {
        let mut flow = VerificationFlow::new();
        let first = image("/tmp/1.jpg");
        let second = image("/tmp/2.jpg");
        let second_id = second.id();

        flow.accept_capture(first);
        flow.accept_capture(second);

        // One pending image, never two.
        assert_eq!(flow.pending().map(|c| c.id()), Some(second_id));
    }

    #[test]
    fn retake_discards_the_pending_image() {
        let mut flow = VerificationFlow::new();

        assert!(!flow.retake());

        flow.accept_capture(image("/tmp/1.jpg"));
        assert!(flow.retake());
        assert_eq!(flow.phase(), VerificationPhase::Instruction);
        assert!(flow.pending().is_none());
    }

    #[test]
    fn cancel_clears_everything_without_outcome() {
        let mut flow = VerificationFlow::new();
        flow.accept_capture(image("/tmp/1.jpg"));

        flow.cancel();

        assert_eq!(flow.phase(), VerificationPhase::Instruction);
        assert!(flow.confirm("anywhere").is_none());
    }
}
