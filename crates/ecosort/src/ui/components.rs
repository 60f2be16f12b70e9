use bevy::prelude::*;
use ecosort_core::anim::RewardTimeline;
use ecosort_core::{RewardEvent, VerificationFlow};

/// Resting fill of neutral buttons on the light theme.
pub const NORMAL_BUTTON: Color = Color::WHITE;
pub const HOVERED_BUTTON: Color = Color::srgb(0.96, 0.96, 0.96);
pub const PRESSED_BUTTON: Color = Color::srgb(0.91, 0.96, 0.91);

/// Run condition: no overlay is showing. Button handlers of the surfaces
/// underneath gate on this, so everything behind an open modal is inert.
pub fn modals_closed(verification: Res<VerificationModal>, reward: Res<RewardModal>) -> bool {
    verification.is_closed() && reward.is_closed()
}

/// Formats a point total with thousands separators, e.g. 1250 -> "1,250".
pub fn thousands(value: u32) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// State of the disposal verification overlay, opened from the area screen.
///
/// The overlay entities are spawned and despawned from this resource's
/// change ticks, so every mutation goes through the setters.
#[derive(Resource, Default)]
pub struct VerificationModal {
    open: bool,
    pub flow: VerificationFlow,
    /// Last platform failure, shown inside the overlay.
    pub notice: Option<String>,
}

impl VerificationModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Opens with a fresh flow; a previous session never leaks in.
    pub fn set_open(&mut self) {
        self.open = true;
        self.flow = VerificationFlow::new();
        self.notice = None;
    }

    pub fn set_closed(&mut self) {
        self.open = false;
        self.flow.cancel();
        self.notice = None;
    }
}

/// Which screen a reward celebration belongs to; dismissal routes back to
/// the owner so it can clean up its own session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardSource {
    #[default]
    Scan,
    Verification,
}

/// State of the reward overlay plus its animation timeline.
#[derive(Resource, Default)]
pub struct RewardModal {
    event: Option<RewardEvent>,
    source: RewardSource,
    pub timeline: RewardTimeline,
}

impl RewardModal {
    pub fn is_open(&self) -> bool {
        self.event.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.event.is_none()
    }

    pub fn set_open(&mut self, event: RewardEvent, source: RewardSource) {
        self.timeline.begin(event.points_earned);
        self.source = source;
        self.event = Some(event);
    }

    /// Hiding also zeroes the timeline so a later celebration replays from
    /// the start.
    pub fn set_closed(&mut self) {
        self.event = None;
        self.timeline.reset();
    }

    pub fn event(&self) -> Option<&RewardEvent> {
        self.event.as_ref()
    }

    pub fn source(&self) -> RewardSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_verification_starts_a_fresh_flow() {
        let mut modal = VerificationModal::default();
        modal.set_open();
        modal
            .flow
            .accept_capture(ecosort_core::CaptureRef::new(
                "/tmp/v.jpg",
                ecosort_core::CaptureSource::Camera,
            ));
        modal.set_closed();

        modal.set_open();
        assert!(modal.flow.pending().is_none());
        assert!(modal.notice.is_none());
    }

    #[test]
    fn closing_the_reward_modal_resets_the_timeline() {
        let mut modal = RewardModal::default();
        modal.set_open(RewardEvent::for_verification(), RewardSource::Verification);
        modal.timeline.tick(5.0);
        assert!(modal.timeline.is_visible());

        modal.set_closed();
        assert!(modal.is_closed());
        assert!(!modal.timeline.is_visible());
        assert_eq!(modal.timeline.points_shown(), 0);
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1250), "1,250");
        assert_eq!(thousands(1_000_000), "1,000,000");
    }
}
