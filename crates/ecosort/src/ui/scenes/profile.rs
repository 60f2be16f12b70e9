use app::{LOG_FLOW, LOG_UI};
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_core::profile::{UserProfile, recent_achievement};

use crate::ui::components::{
    HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, modals_closed, thousands,
};
use crate::utils::cleanup;
use crate::{AppState, TabState, theme};

/// Plugin for the profile tab: account presets, lifetime stats, settings
/// toggles and sign-out.
pub struct ProfileScenePlugin;

impl Plugin for ProfileScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProfileToggles>()
            .add_systems(OnEnter(TabState::Profile), setup_profile)
            .add_systems(
                Update,
                (
                    handle_profile_buttons.run_if(modals_closed),
                    refresh_profile_view,
                )
                    .chain()
                    .run_if(in_state(TabState::Profile)),
            )
            .add_systems(OnExit(TabState::Profile), cleanup::<ProfileEntity>)
            .add_systems(OnExit(AppState::Tabs), reset_profile_state);
    }
}

/// Settings switches. Purely local; nothing reads them besides this screen.
#[derive(Resource)]
struct ProfileToggles {
    notifications: bool,
    location: bool,
}

impl Default for ProfileToggles {
    fn default() -> Self {
        Self {
            notifications: true,
            location: true,
        }
    }
}

/// Marker component for profile screen entities
#[derive(Component)]
struct ProfileEntity;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum ProfileAction {
    ToggleNotifications,
    ToggleLocation,
    SignOut,
}

fn setup_profile(mut commands: Commands, toggles: Res<ProfileToggles>) {
    debug!(target: LOG_UI, "showing profile screen");
    spawn_profile_ui(&mut commands, &toggles);
}

fn refresh_profile_view(
    mut commands: Commands,
    toggles: Res<ProfileToggles>,
    existing: Query<Entity, With<ProfileEntity>>,
) {
    if !toggles.is_changed() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    spawn_profile_ui(&mut commands, &toggles);
}

fn spawn_profile_ui(commands: &mut Commands, toggles: &ProfileToggles) {
    let profile = UserProfile::preset();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::bottom(Val::Px(72.0)),
                ..default()
            },
            BackgroundColor(theme::SCREEN_BG),
            ProfileEntity,
            Name::new("Profile Screen"),
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    width: Val::Px(520.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|content| {
                    content.spawn((
                        Text::new("Profile"),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));

                    spawn_account_card(content, &profile);
                    spawn_stats_grid(content, &profile);
                    spawn_achievement_card(content);
                    spawn_settings_card(content, toggles);

                    content
                        .spawn(Node {
                            width: Val::Percent(100.0),
                            justify_content: JustifyContent::Center,
                            ..default()
                        })
                        .with_children(|footer| {
                            footer.spawn((
                                Text::new(format!("EcoSort v{}", env!("CARGO_PKG_VERSION"))),
                                TextFont {
                                    font_size: 12.0,
                                    ..default()
                                },
                                TextColor(theme::TEXT_FAINT),
                            ));
                        });
                });
        });
}

fn spawn_account_card(content: &mut RelatedSpawnerCommands<ChildOf>, profile: &UserProfile) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn(Node {
                align_items: AlignItems::Center,
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|identity| {
                identity
                    .spawn((
                        Node {
                            width: Val::Px(56.0),
                            height: Val::Px(56.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BorderRadius::all(Val::Px(28.0)),
                        BackgroundColor(theme::BRAND),
                    ))
                    .with_children(|avatar| {
                        avatar.spawn((
                            Text::new(initials(profile.name)),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
                identity
                    .spawn(Node {
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(2.0),
                        ..default()
                    })
                    .with_children(|lines| {
                        lines.spawn((
                            Text::new(profile.name),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_PRIMARY),
                        ));
                        lines.spawn((
                            Text::new(profile.email),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_SECONDARY),
                        ));
                    });
            });

            card.spawn((
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                    ..default()
                },
                BorderRadius::all(Val::Px(12.0)),
                BackgroundColor(theme::BRAND_TINT),
            ))
            .with_children(|pill| {
                pill.spawn((
                    Text::new(format!("{} P", thousands(profile.stats.total_points))),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(theme::BRAND),
                ));
            });
        });
}

fn spawn_stats_grid(content: &mut RelatedSpawnerCommands<ChildOf>, profile: &UserProfile) {
    let stats = [
        (format!("{}", profile.stats.disposal_count), "Disposals"),
        (format!("{}%", profile.stats.accuracy_percent()), "Accuracy"),
        (format!("{} days", profile.stats.streak_days), "Streak"),
        (format!("Lv {}", profile.stats.level), "Level"),
    ];

    for pair in stats.chunks(2) {
        content
            .spawn(Node {
                width: Val::Percent(100.0),
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                for (value, label) in pair {
                    row.spawn((
                        Node {
                            flex_grow: 1.0,
                            flex_basis: Val::Px(0.0),
                            flex_direction: FlexDirection::Column,
                            align_items: AlignItems::Center,
                            row_gap: Val::Px(4.0),
                            padding: UiRect::all(Val::Px(12.0)),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(12.0)),
                        BackgroundColor(theme::CARD_BG),
                    ))
                    .with_children(|cell| {
                        cell.spawn((
                            Text::new(value.clone()),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_PRIMARY),
                        ));
                        cell.spawn((
                            Text::new(*label),
                            TextFont {
                                font_size: 12.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_SECONDARY),
                        ));
                    });
                }
            });
    }
}

fn spawn_achievement_card(content: &mut RelatedSpawnerCommands<ChildOf>) {
    let achievement = recent_achievement();

    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                align_items: AlignItems::Center,
                column_gap: Val::Px(12.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn((
                Node {
                    width: Val::Px(32.0),
                    height: Val::Px(32.0),
                    ..default()
                },
                BorderRadius::all(Val::Px(16.0)),
                BackgroundColor(theme::STAR_GOLD),
            ));
            card.spawn(Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            })
            .with_children(|lines| {
                lines.spawn((
                    Text::new("Recent achievement"),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
                lines.spawn((
                    Text::new(achievement.title.clone()),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
                lines.spawn((
                    Text::new(achievement.description.clone()),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
            });
        });
}

fn spawn_settings_card(content: &mut RelatedSpawnerCommands<ChildOf>, toggles: &ProfileToggles) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            spawn_toggle_row(
                card,
                "Notifications",
                toggles.notifications,
                ProfileAction::ToggleNotifications,
            );
            spawn_toggle_row(
                card,
                "Location access",
                toggles.location,
                ProfileAction::ToggleLocation,
            );

            card.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(1.0),
                    margin: UiRect::axes(Val::Px(0.0), Val::Px(4.0)),
                    ..default()
                },
                BackgroundColor(theme::HAIRLINE),
            ));

            card.spawn((
                Button,
                Node {
                    width: Val::Percent(100.0),
                    padding: UiRect::axes(Val::Px(4.0), Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(NORMAL_BUTTON),
                ProfileAction::SignOut,
            ))
            .with_children(|row| {
                row.spawn((
                    Text::new("Sign out"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(theme::ALERT),
                ));
            });
        });
}

fn spawn_toggle_row(
    card: &mut RelatedSpawnerCommands<ChildOf>,
    label: &str,
    on: bool,
    action: ProfileAction,
) {
    card.spawn((
        Button,
        Node {
            width: Val::Percent(100.0),
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            padding: UiRect::axes(Val::Px(4.0), Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(NORMAL_BUTTON),
        action,
    ))
    .with_children(|row| {
        row.spawn((
            Text::new(label),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(theme::TEXT_PRIMARY),
        ));
        row.spawn((
            Node {
                width: Val::Px(36.0),
                height: Val::Px(20.0),
                padding: UiRect::all(Val::Px(2.0)),
                justify_content: if on {
                    JustifyContent::FlexEnd
                } else {
                    JustifyContent::FlexStart
                },
                align_items: AlignItems::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(10.0)),
            BackgroundColor(if on { theme::BRAND } else { theme::HAIRLINE }),
        ))
        .with_children(|track| {
            track.spawn((
                Node {
                    width: Val::Px(14.0),
                    height: Val::Px(14.0),
                    ..default()
                },
                BorderRadius::all(Val::Px(7.0)),
                BackgroundColor(Color::WHITE),
            ));
        });
    });
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect()
}

fn handle_profile_buttons(
    mut interactions: Query<
        (&Interaction, &ProfileAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut toggles: ResMut<ProfileToggles>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for (interaction, action, mut color) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                *color = PRESSED_BUTTON.into();
                match action {
                    ProfileAction::ToggleNotifications => {
                        toggles.notifications = !toggles.notifications;
                        info!(
                            target: LOG_UI,
                            "notifications {}",
                            if toggles.notifications { "on" } else { "off" }
                        );
                    }
                    ProfileAction::ToggleLocation => {
                        toggles.location = !toggles.location;
                        info!(
                            target: LOG_UI,
                            "location access {}",
                            if toggles.location { "on" } else { "off" }
                        );
                    }
                    ProfileAction::SignOut => {
                        info!(target: LOG_FLOW, "signing out");
                        next_state.set(AppState::SignIn);
                    }
                }
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
            }
        }
    }
}

/// Settings go back to their defaults when the account signs out.
fn reset_profile_state(mut toggles: ResMut<ProfileToggles>) {
    *toggles = ProfileToggles::default();
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use test_log::test;

    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.insert_state(AppState::Tabs);
        app.init_resource::<ProfileToggles>();
        app.add_systems(Update, handle_profile_buttons);
        app
    }

    fn press(app: &mut App, action: ProfileAction) {
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            action,
            BackgroundColor(NORMAL_BUTTON),
        ));
    }

    #[test]
    fn toggles_flip_on_press() {
        let mut app = test_app();
        assert!(app.world().resource::<ProfileToggles>().notifications);

        press(&mut app, ProfileAction::ToggleNotifications);
        app.update();
        let toggles = app.world().resource::<ProfileToggles>();
        assert!(!toggles.notifications);
        assert!(toggles.location);
    }

    #[test]
    fn sign_out_returns_to_the_sign_in_screen() {
        let mut app = test_app();
        press(&mut app, ProfileAction::SignOut);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::SignIn
        );
    }

    #[test]
    fn initials_take_the_first_letters_of_two_words() {
        assert_eq!(initials("Eco Guardian"), "EG");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("Mary Jane Watson"), "MJ");
    }
}
