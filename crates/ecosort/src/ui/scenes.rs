mod area;
mod home;
mod profile;
mod scan;
mod sign_in;

use bevy::prelude::*;

pub use area::{AreaScenePlugin, CurrentLocation};
pub use home::HomeScenePlugin;
pub use profile::ProfileScenePlugin;
pub use scan::{AnalysisBackend, ScanScenePlugin, ScanSession};
pub use sign_in::SignInScenePlugin;

/// Main scene plugin that coordinates all scene sub-plugins
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SignInScenePlugin,
            HomeScenePlugin,
            ScanScenePlugin,
            AreaScenePlugin,
            ProfileScenePlugin,
        ));
    }
}
