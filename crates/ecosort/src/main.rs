mod platform;
mod theme;
mod ui;
mod utils;

use app::{AppBuilder, Application, BoxError, LOG_MAIN};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use ecosort_config::{AppEcosortConfigExt, EcosortConfig};
use tracing::info;

use crate::platform::{CaptureStorage, PlatformPlugin};
use crate::ui::UIPlugin;

/// Top-level screens. Sign-in hands over to the tab shell and never comes
/// back within a session.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    SignIn,
    Tabs,
}

/// The four tabs of the shell, only alive while [`AppState::Tabs`] is.
#[derive(SubStates, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[source(AppState = AppState::Tabs)]
pub enum TabState {
    #[default]
    Home,
    Scan,
    Area,
    Profile,
}

struct EcosortApp;

impl Application for EcosortApp {
    const APP_ID: &'static str = "ecosort";
}

fn main() -> Result<(), BoxError> {
    let mut app =
        AppBuilder::<EcosortApp>::new(env!("CARGO_PKG_VERSION"))?.build_with_bevy(|mut app, ctx| {
            let config = EcosortConfig::load_or_init(&ctx.path_context().settings_file(None));
            info!(
                target: LOG_MAIN,
                "starting {} v{}", ctx.app_id(), ctx.version()
            );

            let window_title = config.general.window_title.clone();
            let start_signed_in = config.general.start_signed_in;

            app.add_plugins(
                DefaultPlugins
                    .build()
                    .disable::<LogPlugin>()
                    .set(WindowPlugin {
                        primary_window: Some(Window {
                            title: window_title,
                            ..default()
                        }),
                        ..default()
                    }),
            );

            let mut app = app.use_ecosort_config(config);
            app.insert_resource(CaptureStorage::new(ctx.path_context().captures_dir()));

            if start_signed_in {
                app.insert_state(AppState::Tabs);
            } else {
                app.init_state::<AppState>();
            }
            app.add_sub_state::<TabState>();

            app.add_plugins((PlatformPlugin, UIPlugin));
            app
        });

    app.run();
    Ok(())
}
