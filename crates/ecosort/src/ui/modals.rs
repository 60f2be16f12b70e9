//! Overlay modals layered above the tab shell.

mod reward;
mod verification;

use bevy::prelude::*;

pub use reward::RewardDismissed;
pub use verification::VerificationFinished;

pub struct ModalPlugin;

impl Plugin for ModalPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            verification::VerificationModalPlugin,
            reward::RewardModalPlugin,
        ));
    }
}
