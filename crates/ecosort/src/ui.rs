pub mod components;
pub mod modals;
pub mod scenes;
pub mod tab_bar;

use bevy::prelude::*;
use components::{RewardModal, VerificationModal};
use modals::ModalPlugin;
use scenes::ScenePlugin;
use tab_bar::TabBarPlugin;

/// Main UI plugin coordinating the scenes, the tab bar and the overlays.
pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ScenePlugin, TabBarPlugin, ModalPlugin))
            .init_resource::<VerificationModal>()
            .init_resource::<RewardModal>()
            .add_systems(Startup, spawn_ui_camera_once);
    }
}

/// Marker for the single persistent UI camera.
#[derive(Component)]
struct UiCamera;

fn spawn_ui_camera_once(mut commands: Commands, existing: Query<Entity, With<UiCamera>>) {
    if existing.is_empty() {
        commands.spawn((Camera2d, UiCamera, Name::new("UI Camera")));
    }
}
