use app::LOG_FLOW;
use bevy::prelude::*;
use ecosort_config::Simulation;

use crate::AppState;
use crate::theme;
use crate::utils::{cleanup, remove};

/// Plugin for the simulated sign-in screen.
pub struct SignInScenePlugin;

impl Plugin for SignInScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::SignIn), setup_sign_in)
            .add_systems(
                Update,
                (handle_provider_buttons, finish_sign_in).run_if(in_state(AppState::SignIn)),
            )
            .add_systems(
                OnExit(AppState::SignIn),
                (cleanup::<SignInEntity>, remove::<SignInSession>),
            );
    }
}

/// Marker component for sign-in screen entities
#[derive(Component)]
struct SignInEntity;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum SignInProvider {
    Kakao,
    Naver,
}

impl SignInProvider {
    fn short(self) -> &'static str {
        match self {
            SignInProvider::Kakao => "Kakao",
            SignInProvider::Naver => "Naver",
        }
    }

    fn button_label(self) -> String {
        format!("Continue with {}", self.short())
    }

    fn fill(self) -> Color {
        match self {
            SignInProvider::Kakao => theme::KAKAO,
            SignInProvider::Naver => theme::NAVER,
        }
    }

    fn text_color(self) -> Color {
        match self {
            SignInProvider::Kakao => Color::srgb(0.1, 0.1, 0.1),
            SignInProvider::Naver => Color::WHITE,
        }
    }
}

/// Pending simulated sign-in; the screen is inert while this exists.
#[derive(Resource)]
struct SignInSession {
    provider: SignInProvider,
    timer: Timer,
}

/// Status line under the provider buttons.
#[derive(Component)]
struct SignInStatus;

fn setup_sign_in(mut commands: Commands) {
    info!(target: LOG_FLOW, "showing sign-in screen");

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(theme::BRAND),
            SignInEntity,
            Name::new("Sign-In Screen"),
        ))
        .with_children(|parent| {
            // Logo badge
            parent
                .spawn((
                    Node {
                        width: Val::Px(96.0),
                        height: Val::Px(96.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        margin: UiRect::bottom(Val::Px(8.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(48.0)),
                    BackgroundColor(Color::WHITE),
                ))
                .with_children(|badge| {
                    badge.spawn((
                        Text::new("ES"),
                        TextFont {
                            font_size: 40.0,
                            ..default()
                        },
                        TextColor(theme::BRAND),
                    ));
                });

            parent.spawn((
                Text::new("EcoSort"),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Snap your waste, sort it right"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
            ));

            // Spacer between branding and the provider buttons
            parent.spawn(Node {
                height: Val::Px(32.0),
                ..default()
            });

            for provider in [SignInProvider::Kakao, SignInProvider::Naver] {
                parent
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(280.0),
                            height: Val::Px(52.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BorderColor::all(Color::NONE),
                        BorderRadius::all(Val::Px(26.0)),
                        BackgroundColor(provider.fill()),
                        provider,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(provider.button_label()),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(provider.text_color()),
                        ));
                    });
            }

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                SignInStatus,
            ));

            parent.spawn((
                Text::new("Simulated sign-in. No account data leaves this device."),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            ));
        });
}

fn handle_provider_buttons(
    mut commands: Commands,
    mut interactions: Query<
        (&Interaction, &SignInProvider, &mut BorderColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut status: Query<&mut Text, With<SignInStatus>>,
    session: Option<Res<SignInSession>>,
    simulation: Res<Simulation>,
) {
    for (interaction, provider, mut border) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                // A second tap while the first sign-in is pending is inert.
                if session.is_some() {
                    continue;
                }
                info!(target: LOG_FLOW, "sign-in started via {}", provider.short());
                commands.insert_resource(SignInSession {
                    provider: *provider,
                    timer: Timer::from_seconds(simulation.sign_in_delay_secs, TimerMode::Once),
                });
                if let Ok(mut text) = status.single_mut() {
                    text.0 = format!("Signing in with {}...", provider.short());
                }
            }
            Interaction::Hovered => {
                *border = BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.8));
            }
            Interaction::None => {
                *border = BorderColor::all(Color::NONE);
            }
        }
    }
}

fn finish_sign_in(
    time: Res<Time>,
    session: Option<ResMut<SignInSession>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(mut session) = session else {
        return;
    };
    if session.timer.tick(time.delta()).just_finished() {
        info!(
            target: LOG_FLOW,
            "signed in via {}, entering the tab shell",
            session.provider.short()
        );
        next_state.set(AppState::Tabs);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::state::app::StatesPlugin;

    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        app.init_resource::<Time>();
        app.insert_resource(Simulation::default());
        app.add_systems(Update, (handle_provider_buttons, finish_sign_in).chain());
        app
    }

    fn advance(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    fn press(app: &mut App, provider: SignInProvider) -> Entity {
        app.world_mut()
            .spawn((
                Button,
                Interaction::Pressed,
                provider,
                BorderColor::all(Color::NONE),
            ))
            .id()
    }

    #[test]
    fn provider_press_enters_the_tab_shell_after_the_delay() {
        let mut app = test_app();
        press(&mut app, SignInProvider::Kakao);

        app.update();
        assert!(app.world().contains_resource::<SignInSession>());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::SignIn
        );

        // Default delay is 1.5 s; the transition applies on the next frame.
        advance(&mut app, 1.6);
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Tabs
        );
    }

    #[test]
    fn second_press_does_not_restart_the_pending_sign_in() {
        let mut app = test_app();
        let button = press(&mut app, SignInProvider::Kakao);
        app.update();

        advance(&mut app, 1.0);
        // Tap again midway; the original timer keeps running.
        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Pressed;
        advance(&mut app, 0.6);
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Tabs
        );
    }
}
