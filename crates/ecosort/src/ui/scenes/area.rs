use app::{LOG_FLOW, LOG_UI};
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_core::disposal::{Coordinates, DisposalPoint, MapBounds, PointKind, disposal_points};
use ecosort_core::{RewardEvent, Weekday, schedule_for};
use strum::IntoEnumIterator;

use crate::platform::{LocationRequest, LocationResolved};
use crate::ui::components::{
    HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, RewardModal, RewardSource, VerificationModal,
    modals_closed,
};
use crate::ui::modals::VerificationFinished;
use crate::utils::cleanup;
use crate::{AppState, TabState, theme};

const NOTICES: [&str; 2] = [
    "Bulky waste pickups must be booked by phone one day ahead.",
    "On public holidays collection shifts to the next working day.",
];

/// Plugin for the area tab: location, weekly schedule, nearby disposal
/// points and the entry into disposal verification.
pub struct AreaScenePlugin;

impl Plugin for AreaScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedDay>()
            .init_resource::<CurrentLocation>()
            .add_systems(OnEnter(TabState::Area), (setup_area, request_location_fix))
            // Runs on every tab so an in-flight fix is not lost when the
            // user switches away before it resolves.
            .add_systems(Update, on_location_resolved.run_if(in_state(AppState::Tabs)))
            .add_systems(
                Update,
                (
                    handle_area_buttons.run_if(modals_closed),
                    on_verification_finished,
                    refresh_area_view,
                )
                    .chain()
                    .run_if(in_state(TabState::Area)),
            )
            .add_systems(OnExit(TabState::Area), cleanup::<AreaEntity>)
            .add_systems(OnExit(AppState::Tabs), reset_area_state);
    }
}

/// Day highlighted in the schedule card. Defaults to the local calendar day.
#[derive(Resource)]
struct SelectedDay(Weekday);

impl Default for SelectedDay {
    fn default() -> Self {
        Self(Weekday::today())
    }
}

/// Latest simulated location fix.
#[derive(Resource, Default)]
pub struct CurrentLocation {
    pub address: Option<String>,
    pub coords: Option<Coordinates>,
    pub resolving: bool,
}

/// Marker component for area screen entities
#[derive(Component)]
struct AreaEntity;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum AreaAction {
    RefreshLocation,
    EditLocation,
    SelectDay(Weekday),
    VerifyDisposal,
}

fn setup_area(
    mut commands: Commands,
    selected: Res<SelectedDay>,
    location: Res<CurrentLocation>,
) {
    debug!(target: LOG_UI, "showing area screen");
    spawn_area_ui(&mut commands, &selected, &location);
}

fn request_location_fix(
    mut location: ResMut<CurrentLocation>,
    mut requests: MessageWriter<LocationRequest>,
) {
    if location.address.is_some() || location.resolving {
        return;
    }
    info!(target: LOG_FLOW, "requesting location fix");
    location.resolving = true;
    requests.write(LocationRequest);
}

fn refresh_area_view(
    mut commands: Commands,
    selected: Res<SelectedDay>,
    location: Res<CurrentLocation>,
    existing: Query<Entity, With<AreaEntity>>,
) {
    if !(selected.is_changed() || location.is_changed()) {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    spawn_area_ui(&mut commands, &selected, &location);
}

fn spawn_area_ui(commands: &mut Commands, selected: &SelectedDay, location: &CurrentLocation) {
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
            AreaEntity,
            Name::new("Area Screen"),
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(16.0)),
                    ..default()
                })
                .with_children(|content| {
                    content.spawn((
                        Text::new("My Area"),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));

                    content
                        .spawn(Node {
                            column_gap: Val::Px(16.0),
                            align_items: AlignItems::FlexStart,
                            ..default()
                        })
                        .with_children(|columns| {
                            columns
                                .spawn(Node {
                                    width: Val::Px(340.0),
                                    flex_direction: FlexDirection::Column,
                                    row_gap: Val::Px(12.0),
                                    ..default()
                                })
                                .with_children(|left| {
                                    spawn_location_card(left, location);
                                    spawn_day_selector(left, selected.0);
                                    spawn_schedule_card(left, selected.0);
                                    spawn_notices_card(left);
                                });

                            columns
                                .spawn(Node {
                                    width: Val::Px(340.0),
                                    flex_direction: FlexDirection::Column,
                                    row_gap: Val::Px(12.0),
                                    ..default()
                                })
                                .with_children(|right| {
                                    spawn_map_card(right, location.coords);
                                    for point in disposal_points() {
                                        spawn_point_card(right, point);
                                    }
                                    spawn_verify_button(right);
                                });
                        });
                });
        });
}

fn spawn_location_card(column: &mut RelatedSpawnerCommands<ChildOf>, location: &CurrentLocation) {
    let address_line = if location.resolving {
        "Locating...".to_string()
    } else {
        location
            .address
            .clone()
            .unwrap_or_else(|| "Location unavailable".into())
    };

    column
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn(Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            })
            .with_children(|lines| {
                lines.spawn((
                    Text::new("Current location"),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
                lines.spawn((
                    Text::new(address_line),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
            });

            card.spawn(Node {
                column_gap: Val::Px(6.0),
                ..default()
            })
            .with_children(|chips| {
                for (label, action) in [
                    ("Refresh", AreaAction::RefreshLocation),
                    ("Edit", AreaAction::EditLocation),
                ] {
                    chips
                        .spawn((
                            Button,
                            Node {
                                padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                            BorderColor::all(theme::HAIRLINE),
                            BorderRadius::all(Val::Px(8.0)),
                            BackgroundColor(NORMAL_BUTTON),
                            action,
                        ))
                        .with_children(|chip| {
                            chip.spawn((
                                Text::new(label),
                                TextFont {
                                    font_size: 12.0,
                                    ..default()
                                },
                                TextColor(theme::TEXT_SECONDARY),
                            ));
                        });
                }
            });
        });
}

fn spawn_day_selector(column: &mut RelatedSpawnerCommands<ChildOf>, selected: Weekday) {
    column
        .spawn(Node {
            width: Val::Percent(100.0),
            justify_content: JustifyContent::SpaceBetween,
            ..default()
        })
        .with_children(|row| {
            for day in Weekday::iter() {
                let active = day == selected;
                row.spawn((
                    Button,
                    Node {
                        width: Val::Px(42.0),
                        height: Val::Px(32.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BorderRadius::all(Val::Px(16.0)),
                    BackgroundColor(if active { theme::BRAND } else { theme::CARD_BG }),
                    AreaAction::SelectDay(day),
                ))
                .with_children(|chip| {
                    chip.spawn((
                        Text::new(day.short_label()),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(if active {
                            Color::WHITE
                        } else {
                            theme::TEXT_SECONDARY
                        }),
                    ));
                });
            }
        });
}

fn spawn_schedule_card(column: &mut RelatedSpawnerCommands<ChildOf>, day: Weekday) {
    let entry = schedule_for(day);

    column
        .spawn((
            Node {
                width: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn((
                Node {
                    width: Val::Px(4.0),
                    ..default()
                },
                BorderRadius::all(Val::Px(2.0)),
                BackgroundColor(theme::tone_color(entry.tone)),
            ));
            card.spawn(Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                margin: UiRect::left(Val::Px(10.0)),
                ..default()
            })
            .with_children(|lines| {
                lines.spawn((
                    Text::new(entry.day.label()),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
                lines.spawn((
                    Text::new(entry.items),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
                match entry.window {
                    Some(window) => {
                        lines.spawn((
                            Text::new(format!("Put out between {window}")),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(theme::BRAND_DARK),
                        ));
                    }
                    None => {
                        lines.spawn((
                            Text::new("No collection today"),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_FAINT),
                        ));
                    }
                }
            });
        });
}

fn spawn_notices_card(column: &mut RelatedSpawnerCommands<ChildOf>) {
    column
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::TIP_BG),
        ))
        .with_children(|card| {
            card.spawn((
                Text::new("Neighborhood notices"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));
            for notice in NOTICES {
                card.spawn((
                    Text::new(format!("· {notice}")),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
            }
        });
}

fn spawn_map_card(column: &mut RelatedSpawnerCommands<ChildOf>, user: Option<Coordinates>) {
    let bounds = match &user {
        Some(coords) => MapBounds::around(
            disposal_points()
                .iter()
                .map(|p| &p.coords)
                .chain(std::iter::once(coords)),
        ),
        None => MapBounds::around(disposal_points().iter().map(|p| &p.coords)),
    };

    column
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn((
                Text::new("Nearby disposal points"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));

            card.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(180.0),
                    ..default()
                },
                BorderRadius::all(Val::Px(8.0)),
                BackgroundColor(Color::srgb(0.91, 0.94, 0.91)),
            ))
            .with_children(|panel| {
                for point in disposal_points() {
                    let (x, y) = bounds.project(point.coords);
                    panel.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Percent(x * 100.0),
                            top: Val::Percent(y * 100.0),
                            width: Val::Px(12.0),
                            height: Val::Px(12.0),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(6.0)),
                        BackgroundColor(theme::kind_color(point.kind)),
                    ));
                }
                if let Some(coords) = user {
                    let (x, y) = bounds.project(coords);
                    panel
                        .spawn(Node {
                            position_type: PositionType::Absolute,
                            left: Val::Percent(x * 100.0),
                            top: Val::Percent(y * 100.0),
                            flex_direction: FlexDirection::Column,
                            align_items: AlignItems::Center,
                            row_gap: Val::Px(2.0),
                            ..default()
                        })
                        .with_children(|marker| {
                            marker.spawn((
                                Node {
                                    width: Val::Px(14.0),
                                    height: Val::Px(14.0),
                                    border: UiRect::all(Val::Px(2.0)),
                                    ..default()
                                },
                                BorderColor::all(Color::WHITE),
                                BorderRadius::all(Val::Px(7.0)),
                                BackgroundColor(Color::srgb(0.129, 0.588, 0.953)),
                            ));
                            marker.spawn((
                                Text::new("You"),
                                TextFont {
                                    font_size: 10.0,
                                    ..default()
                                },
                                TextColor(theme::TEXT_PRIMARY),
                            ));
                        });
                }
            });

            card.spawn(Node {
                flex_wrap: FlexWrap::Wrap,
                column_gap: Val::Px(10.0),
                row_gap: Val::Px(4.0),
                ..default()
            })
            .with_children(|legend| {
                for kind in PointKind::iter() {
                    legend
                        .spawn(Node {
                            align_items: AlignItems::Center,
                            column_gap: Val::Px(4.0),
                            ..default()
                        })
                        .with_children(|item| {
                            item.spawn((
                                Node {
                                    width: Val::Px(8.0),
                                    height: Val::Px(8.0),
                                    ..default()
                                },
                                BorderRadius::all(Val::Px(4.0)),
                                BackgroundColor(theme::kind_color(kind)),
                            ));
                            item.spawn((
                                Text::new(kind.label()),
                                TextFont {
                                    font_size: 11.0,
                                    ..default()
                                },
                                TextColor(theme::TEXT_SECONDARY),
                            ));
                        });
                }
            });
        });
}

fn spawn_point_card(column: &mut RelatedSpawnerCommands<ChildOf>, point: &DisposalPoint) {
    column
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn(Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            })
            .with_children(|lines| {
                lines.spawn((
                    Text::new(point.name),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
                lines.spawn((
                    Text::new(point.items.join(", ")),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_SECONDARY),
                ));
                lines.spawn((
                    Text::new(point.phone),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_FAINT),
                ));
            });

            card.spawn((
                Node {
                    padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
                    ..default()
                },
                BorderRadius::all(Val::Px(8.0)),
                BackgroundColor(theme::kind_color(point.kind)),
            ))
            .with_children(|chip| {
                chip.spawn((
                    Text::new(point.kind.label()),
                    TextFont {
                        font_size: 11.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
        });
}

fn spawn_verify_button(column: &mut RelatedSpawnerCommands<ChildOf>) {
    column
        .spawn((
            Button,
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(46.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(12.0)),
            BackgroundColor(theme::BRAND),
            AreaAction::VerifyDisposal,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("Verify disposal"),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn chip_palette(action: &AreaAction, selected: Weekday) -> (Color, Color, Color) {
    match action {
        AreaAction::VerifyDisposal => (theme::BRAND, theme::BRAND_DARK, theme::BRAND_PRESSED),
        AreaAction::SelectDay(day) if *day == selected => {
            (theme::BRAND, theme::BRAND_DARK, theme::BRAND_PRESSED)
        }
        _ => (NORMAL_BUTTON, HOVERED_BUTTON, PRESSED_BUTTON),
    }
}

fn handle_area_buttons(
    mut interactions: Query<
        (&Interaction, &AreaAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut selected: ResMut<SelectedDay>,
    mut location: ResMut<CurrentLocation>,
    mut verification: ResMut<VerificationModal>,
    mut requests: MessageWriter<LocationRequest>,
) {
    for (interaction, action, mut color) in &mut interactions {
        let (normal, hovered, pressed) = chip_palette(action, selected.0);
        match *interaction {
            Interaction::Pressed => {
                *color = pressed.into();
                match action {
                    AreaAction::RefreshLocation => {
                        if !location.resolving {
                            info!(target: LOG_FLOW, "refreshing location fix");
                            location.resolving = true;
                            requests.write(LocationRequest);
                        }
                    }
                    AreaAction::EditLocation => {
                        info!(target: LOG_UI, "location editing is not part of the simulation");
                    }
                    AreaAction::SelectDay(day) => {
                        if selected.0 != *day {
                            selected.0 = *day;
                        }
                    }
                    AreaAction::VerifyDisposal => {
                        info!(target: LOG_FLOW, "opening disposal verification");
                        verification.set_open();
                    }
                }
            }
            Interaction::Hovered => {
                *color = hovered.into();
            }
            Interaction::None => {
                *color = normal.into();
            }
        }
    }
}

fn on_location_resolved(
    mut resolved: MessageReader<LocationResolved>,
    mut location: ResMut<CurrentLocation>,
) {
    for fix in resolved.read() {
        info!(target: LOG_FLOW, "location fix: {}", fix.address);
        location.address = Some(fix.address.clone());
        location.coords = Some(fix.coords);
        location.resolving = false;
    }
}

fn on_verification_finished(
    mut finished: MessageReader<VerificationFinished>,
    mut reward: ResMut<RewardModal>,
) {
    for message in finished.read() {
        let event = RewardEvent::for_verification();
        info!(
            target: LOG_FLOW,
            "verification confirmed at {} (+{} P)",
            message.outcome.location,
            event.points_earned
        );
        reward.set_open(event, RewardSource::Verification);
    }
}

/// Signing out forgets the fix and the selection.
fn reset_area_state(mut selected: ResMut<SelectedDay>, mut location: ResMut<CurrentLocation>) {
    *selected = SelectedDay::default();
    *location = CurrentLocation::default();
}

#[cfg(test)]
mod tests {
    use ecosort_core::{CaptureRef, CaptureSource, VerificationOutcome, VerificationPhase};

    use super::*;

    #[derive(Resource, Default)]
    struct SeenRequests(usize);

    fn collect_requests(mut reader: MessageReader<LocationRequest>, mut seen: ResMut<SeenRequests>) {
        seen.0 += reader.read().count();
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<CurrentLocation>();
        app.insert_resource(SelectedDay(Weekday::Sunday));
        app.init_resource::<RewardModal>();
        app.init_resource::<VerificationModal>();
        app.init_resource::<SeenRequests>();
        app.add_message::<LocationRequest>();
        app.add_message::<LocationResolved>();
        app.add_message::<VerificationFinished>();
        app.add_systems(
            Update,
            (
                handle_area_buttons,
                on_location_resolved,
                on_verification_finished,
                collect_requests.after(handle_area_buttons),
            ),
        );
        app
    }

    fn press(app: &mut App, action: AreaAction) {
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            action,
            BackgroundColor(Color::WHITE),
        ));
    }

    #[test]
    fn location_fix_fills_the_card_state() {
        let mut app = test_app();
        app.world_mut().resource_mut::<CurrentLocation>().resolving = true;
        app.world_mut().write_message(LocationResolved {
            address: "Yeoksam-dong, Gangnam-gu, Seoul".into(),
            coords: Coordinates {
                lat: 37.4979,
                lon: 127.0276,
            },
        });

        app.update();
        let location = app.world().resource::<CurrentLocation>();
        assert_eq!(
            location.address.as_deref(),
            Some("Yeoksam-dong, Gangnam-gu, Seoul")
        );
        assert!(!location.resolving);
        assert!(location.coords.is_some());
    }

    #[test]
    fn selecting_a_day_moves_the_highlight() {
        let mut app = test_app();
        press(&mut app, AreaAction::SelectDay(Weekday::Tuesday));

        app.update();
        assert_eq!(app.world().resource::<SelectedDay>().0, Weekday::Tuesday);
    }

    #[test]
    fn verify_button_opens_a_fresh_flow() {
        let mut app = test_app();
        press(&mut app, AreaAction::VerifyDisposal);

        app.update();
        let modal = app.world().resource::<VerificationModal>();
        assert!(modal.is_open());
        assert_eq!(modal.flow.phase(), VerificationPhase::Instruction);
    }

    #[test]
    fn confirmed_verification_opens_the_flat_reward() {
        let mut app = test_app();
        app.world_mut().write_message(VerificationFinished {
            outcome: VerificationOutcome {
                image: CaptureRef::new("/tmp/verify.jpg", CaptureSource::Camera),
                location: "Yeoksam-dong".into(),
            },
        });

        app.update();
        let reward = app.world().resource::<RewardModal>();
        assert!(reward.is_open());
        assert_eq!(reward.source(), RewardSource::Verification);
        assert_eq!(reward.event().map(|e| e.points_earned), Some(15));
    }

    #[test]
    fn refresh_requests_once_and_is_inert_while_pending() {
        let mut app = test_app();
        press(&mut app, AreaAction::RefreshLocation);
        app.update();
        assert_eq!(app.world().resource::<SeenRequests>().0, 1);
        assert!(app.world().resource::<CurrentLocation>().resolving);

        // A second tap while the fix is pending queues nothing.
        press(&mut app, AreaAction::RefreshLocation);
        app.update();
        assert_eq!(app.world().resource::<SeenRequests>().0, 1);
    }
}
