use app::LOG_UI;
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_core::profile::{UserProfile, WeeklyGoal, activity_summary};

use crate::ui::components::{
    HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, modals_closed, thousands,
};
use crate::utils::cleanup;
use crate::{TabState, theme};

const TODAYS_TIP: &str = "Rinse plastic containers before recycling to boost the recycling rate!";

/// Plugin for the home dashboard tab.
pub struct HomeScenePlugin;

impl Plugin for HomeScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(TabState::Home), setup_home)
            .add_systems(
                Update,
                handle_quick_actions
                    .run_if(in_state(TabState::Home).and(modals_closed)),
            )
            .add_systems(OnExit(TabState::Home), cleanup::<HomeEntity>);
    }
}

/// Marker component for home screen entities
#[derive(Component)]
struct HomeEntity;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HomeAction {
    ScanWaste,
    OpenArea,
}

fn setup_home(mut commands: Commands) {
    debug!(target: LOG_UI, "showing home dashboard");

    let profile = UserProfile::preset();
    let goal = WeeklyGoal::preset();

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
            HomeEntity,
            Name::new("Home Screen"),
        ))
        .with_children(|parent| {
            // Greeting header
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(20.0)),
                        ..default()
                    },
                    BackgroundColor(theme::BRAND),
                ))
                .with_children(|header| {
                    header
                        .spawn(Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(4.0),
                            ..default()
                        })
                        .with_children(|greeting| {
                            greeting.spawn((
                                Text::new(format!("Hello, {}", profile.name)),
                                TextFont {
                                    font_size: 22.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                            greeting.spawn((
                                Text::new("Ready to sort some waste today?"),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
                            ));
                        });

                    header
                        .spawn((
                            Node {
                                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                                ..default()
                            },
                            BorderRadius::all(Val::Px(14.0)),
                            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.2)),
                        ))
                        .with_children(|chip| {
                            chip.spawn((
                                Text::new(format!(
                                    "{} P · Lv {}",
                                    thousands(profile.stats.total_points),
                                    profile.stats.level
                                )),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                });

            // Content column
            parent
                .spawn(Node {
                    width: Val::Px(520.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|content| {
                    spawn_quick_actions(content);
                    spawn_activity_row(content);
                    spawn_tip_card(content);
                    spawn_goal_card(content, goal);
                });
        });
}

fn spawn_quick_actions(content: &mut RelatedSpawnerCommands<ChildOf>) {
    content
        .spawn(Node {
            width: Val::Percent(100.0),
            column_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|row| {
            let actions = [
                (
                    HomeAction::ScanWaste,
                    theme::BRAND,
                    "Scan waste",
                    "Point the camera at an item",
                ),
                (
                    HomeAction::OpenArea,
                    Color::srgb(0.129, 0.588, 0.953),
                    "Collection points",
                    "Schedule and nearby drop-offs",
                ),
            ];
            for (action, accent, label, sub) in actions {
                row.spawn((
                    Button,
                    Node {
                        flex_grow: 1.0,
                        flex_basis: Val::Px(0.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(8.0),
                        padding: UiRect::all(Val::Px(18.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(12.0)),
                    BackgroundColor(NORMAL_BUTTON),
                    action,
                ))
                .with_children(|card| {
                    card.spawn((
                        Node {
                            width: Val::Px(14.0),
                            height: Val::Px(14.0),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(7.0)),
                        BackgroundColor(accent),
                    ));
                    card.spawn((
                        Text::new(label),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));
                    card.spawn((
                        Text::new(sub),
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

fn spawn_activity_row(content: &mut RelatedSpawnerCommands<ChildOf>) {
    content
        .spawn(Node {
            width: Val::Percent(100.0),
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|row| {
            for stat in activity_summary() {
                row.spawn((
                    Node {
                        flex_grow: 1.0,
                        flex_basis: Val::Px(0.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(2.0),
                        padding: UiRect::all(Val::Px(12.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(10.0)),
                    BackgroundColor(theme::CARD_BG),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new(stat.value),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));
                    card.spawn((
                        Text::new(stat.label),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_SECONDARY),
                    ));
                    card.spawn((
                        Text::new(stat.delta),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(theme::BRAND),
                    ));
                });
            }
        });
}

fn spawn_tip_card(content: &mut RelatedSpawnerCommands<ChildOf>) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(10.0)),
            BackgroundColor(theme::TIP_BG),
        ))
        .with_children(|card| {
            card.spawn((
                Text::new("Today's eco tip"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme::TEXT_SECONDARY),
            ));
            card.spawn((
                Text::new(TODAYS_TIP),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));
        });
}

fn spawn_goal_card(content: &mut RelatedSpawnerCommands<ChildOf>, goal: WeeklyGoal) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(10.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn(Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new("Weekly goal"),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
                row.spawn((
                    Text::new(format!("{} / {} disposals", goal.done, goal.target)),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(theme::BRAND),
                ));
            });

            // Progress bar
            card.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(8.0),
                    ..default()
                },
                BorderRadius::all(Val::Px(4.0)),
                BackgroundColor(theme::HAIRLINE),
            ))
            .with_children(|bar| {
                bar.spawn((
                    Node {
                        width: Val::Percent(goal.ratio() * 100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(4.0)),
                    BackgroundColor(theme::BRAND),
                ));
            });
        });
}

fn handle_quick_actions(
    mut interactions: Query<
        (&Interaction, &HomeAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_tab: ResMut<NextState<TabState>>,
) {
    for (interaction, action, mut color) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                *color = PRESSED_BUTTON.into();
                match action {
                    HomeAction::ScanWaste => next_tab.set(TabState::Scan),
                    HomeAction::OpenArea => next_tab.set(TabState::Area),
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

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use test_log::test;

    use super::*;
    use crate::AppState;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.insert_state(AppState::Tabs);
        app.add_sub_state::<TabState>();
        app.add_systems(Update, handle_quick_actions);
        app.update();
        app
    }

    fn press(app: &mut App, action: HomeAction) {
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            action,
            BackgroundColor(NORMAL_BUTTON),
        ));
    }

    #[test]
    fn quick_actions_queue_tab_switches() {
        let mut app = test_app();

        press(&mut app, HomeAction::ScanWaste);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<TabState>>().get(),
            TabState::Scan
        );

        press(&mut app, HomeAction::OpenArea);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<TabState>>().get(),
            TabState::Area
        );
    }

    #[test]
    fn quick_action_buttons_repaint_with_interaction() {
        let mut app = test_app();
        let button = app
            .world_mut()
            .spawn((
                Button,
                Interaction::None,
                HomeAction::ScanWaste,
                BackgroundColor(NORMAL_BUTTON),
            ))
            .id();

        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Hovered;
        app.update();
        assert_eq!(
            app.world().get::<BackgroundColor>(button).unwrap().0,
            HOVERED_BUTTON
        );

        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::None;
        app.update();
        assert_eq!(
            app.world().get::<BackgroundColor>(button).unwrap().0,
            NORMAL_BUTTON
        );
    }
}
