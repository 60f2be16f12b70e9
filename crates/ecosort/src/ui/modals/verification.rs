use app::LOG_FLOW;
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_core::reward::VERIFIED_POINTS;
use ecosort_core::{CaptureRef, CaptureSource, VerificationOutcome, VerificationPhase};

use crate::platform::{CaptureCompleted, CaptureFailed, CapturePurpose, CaptureRequest};
use crate::ui::components::{HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, VerificationModal};
use crate::ui::scenes::CurrentLocation;
use crate::utils::cleanup;
use crate::{AppState, theme};

const INSTRUCTIONS: [&str; 3] = [
    "Bag your waste and take it to the disposal point",
    "Take a clear photo of the bagged waste",
    "Review the photo and confirm",
];

/// Emitted exactly once per confirmed disposal verification.
#[derive(Message, Debug, Clone)]
pub struct VerificationFinished {
    pub outcome: VerificationOutcome,
}

/// The two-stage disposal verification overlay.
pub struct VerificationModalPlugin;

impl Plugin for VerificationModalPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<VerificationFinished>()
            .add_systems(
                Update,
                (
                    receive_verification_captures,
                    handle_verification_buttons,
                    refresh_verification_modal,
                )
                    .chain()
                    .run_if(in_state(AppState::Tabs)),
            )
            .add_systems(
                OnExit(AppState::Tabs),
                (close_verification, cleanup::<VerificationUI>),
            );
    }
}

/// Marker component for verification modal entities
#[derive(Component)]
struct VerificationUI;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum VerificationAction {
    TakePhoto,
    Retake,
    Confirm,
    Cancel,
}

/// Rebuilds the overlay when the modal state changes, and keeps the address
/// line current while it is open.
fn refresh_verification_modal(
    mut commands: Commands,
    modal: Res<VerificationModal>,
    location: Res<CurrentLocation>,
    existing: Query<Entity, With<VerificationUI>>,
) {
    let location_changed = modal.is_open() && location.is_changed();
    if !(modal.is_changed() || location_changed) {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    if modal.is_closed() {
        return;
    }
    spawn_verification_modal(&mut commands, &modal, &location);
}

fn spawn_verification_modal(
    commands: &mut Commands,
    modal: &VerificationModal,
    location: &CurrentLocation,
) {
    let address_line = if location.resolving {
        "Locating...".to_string()
    } else {
        location
            .address
            .clone()
            .unwrap_or_else(|| "Location unavailable".into())
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(theme::BACKDROP),
            GlobalZIndex(50),
            VerificationUI,
            Name::new("Verification Modal"),
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        width: Val::Px(400.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(12.0),
                        padding: UiRect::all(Val::Px(20.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(16.0)),
                    BackgroundColor(theme::CARD_BG),
                ))
                .with_children(|card| match modal.flow.phase() {
                    VerificationPhase::Instruction => {
                        spawn_instruction_phase(card, &address_line, modal.notice.as_deref());
                    }
                    VerificationPhase::Captured => {
                        spawn_review_phase(
                            card,
                            modal.flow.pending(),
                            &address_line,
                            modal.notice.as_deref(),
                        );
                    }
                });
        });
}

fn spawn_instruction_phase(
    card: &mut RelatedSpawnerCommands<ChildOf>,
    address: &str,
    notice: Option<&str>,
) {
    card.spawn((
        Text::new("Verify disposal"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(theme::TEXT_PRIMARY),
    ));
    card.spawn((
        Text::new(format!(
            "Earn {VERIFIED_POINTS} P by confirming your disposal"
        )),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(theme::TEXT_SECONDARY),
    ));

    for (index, step) in INSTRUCTIONS.iter().enumerate() {
        card.spawn(Node {
            column_gap: Val::Px(8.0),
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Node {
                    width: Val::Px(20.0),
                    height: Val::Px(20.0),
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BorderRadius::all(Val::Px(10.0)),
                BackgroundColor(theme::BRAND_TINT),
            ))
            .with_children(|badge| {
                badge.spawn((
                    Text::new(format!("{}", index + 1)),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(theme::BRAND),
                ));
            });
            row.spawn((
                Text::new(*step),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));
        });
    }

    spawn_location_row(card, address);
    spawn_notice(card, notice);

    card.spawn(Node {
        width: Val::Percent(100.0),
        column_gap: Val::Px(10.0),
        margin: UiRect::top(Val::Px(4.0)),
        ..default()
    })
    .with_children(|buttons| {
        spawn_modal_button(buttons, "Cancel", VerificationAction::Cancel);
        spawn_modal_button(buttons, "Take photo", VerificationAction::TakePhoto);
    });
}

fn spawn_review_phase(
    card: &mut RelatedSpawnerCommands<ChildOf>,
    pending: Option<&CaptureRef>,
    address: &str,
    notice: Option<&str>,
) {
    card.spawn((
        Text::new("Review your photo"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(theme::TEXT_PRIMARY),
    ));

    card.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(160.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(4.0),
            ..default()
        },
        BorderRadius::all(Val::Px(8.0)),
        BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
    ))
    .with_children(|preview| {
        if let Some(image) = pending {
            preview.spawn((
                Text::new(format!("Photo {}", image.short_id())),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
            ));
            preview.spawn((
                Text::new(match image.source() {
                    CaptureSource::Camera => "via camera",
                    CaptureSource::Library => "via library",
                }),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
            ));
        }
    });

    spawn_location_row(card, address);
    spawn_notice(card, notice);

    card.spawn(Node {
        width: Val::Percent(100.0),
        column_gap: Val::Px(10.0),
        margin: UiRect::top(Val::Px(4.0)),
        ..default()
    })
    .with_children(|buttons| {
        spawn_modal_button(buttons, "Retake", VerificationAction::Retake);
        spawn_modal_button(buttons, "Confirm", VerificationAction::Confirm);
    });

    card.spawn(Node {
        width: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        ..default()
    })
    .with_children(|row| {
        row.spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(NORMAL_BUTTON),
            VerificationAction::Cancel,
        ))
        .with_children(|link| {
            link.spawn((
                Text::new("Cancel"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme::TEXT_FAINT),
            ));
        });
    });
}

fn spawn_location_row(card: &mut RelatedSpawnerCommands<ChildOf>, address: &str) {
    card.spawn(Node {
        align_items: AlignItems::Center,
        column_gap: Val::Px(6.0),
        ..default()
    })
    .with_children(|row| {
        row.spawn((
            Node {
                width: Val::Px(8.0),
                height: Val::Px(8.0),
                ..default()
            },
            BorderRadius::all(Val::Px(4.0)),
            BackgroundColor(theme::BRAND),
        ));
        row.spawn((
            Text::new(address.to_string()),
            TextFont {
                font_size: 13.0,
                ..default()
            },
            TextColor(theme::TEXT_SECONDARY),
        ));
    });
}

fn spawn_notice(card: &mut RelatedSpawnerCommands<ChildOf>, notice: Option<&str>) {
    if let Some(notice) = notice {
        card.spawn((
            Text::new(notice.to_string()),
            TextFont {
                font_size: 13.0,
                ..default()
            },
            TextColor(theme::ALERT),
        ));
    }
}

fn spawn_modal_button(
    buttons: &mut RelatedSpawnerCommands<ChildOf>,
    label: &str,
    action: VerificationAction,
) {
    let filled = matches!(
        action,
        VerificationAction::TakePhoto | VerificationAction::Confirm
    );

    let mut button = buttons.spawn((
        Button,
        Node {
            flex_grow: 1.0,
            height: Val::Px(42.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
        BorderColor::all(if filled { Color::NONE } else { theme::HAIRLINE }),
        BorderRadius::all(Val::Px(10.0)),
        BackgroundColor(if filled { theme::BRAND } else { NORMAL_BUTTON }),
        action,
    ));
    button.with_children(|inner| {
        inner.spawn((
            Text::new(label),
            TextFont {
                font_size: 15.0,
                ..default()
            },
            TextColor(if filled {
                Color::WHITE
            } else {
                theme::TEXT_SECONDARY
            }),
        ));
    });
}

fn button_palette(action: VerificationAction) -> (Color, Color, Color) {
    match action {
        VerificationAction::TakePhoto | VerificationAction::Confirm => {
            (theme::BRAND, theme::BRAND_DARK, theme::BRAND_PRESSED)
        }
        _ => (NORMAL_BUTTON, HOVERED_BUTTON, PRESSED_BUTTON),
    }
}

fn handle_verification_buttons(
    mut interactions: Query<
        (&Interaction, &VerificationAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut modal: ResMut<VerificationModal>,
    location: Res<CurrentLocation>,
    mut requests: MessageWriter<CaptureRequest>,
    mut finished: MessageWriter<VerificationFinished>,
) {
    for (interaction, action, mut color) in &mut interactions {
        let (normal, hovered, pressed) = button_palette(*action);
        match *interaction {
            Interaction::Pressed => {
                *color = pressed.into();
                match action {
                    VerificationAction::TakePhoto => {
                        info!(target: LOG_FLOW, "verification photo requested");
                        modal.notice = None;
                        requests.write(CaptureRequest {
                            purpose: CapturePurpose::Verification,
                            source: CaptureSource::Camera,
                        });
                    }
                    VerificationAction::Retake => {
                        if modal.flow.retake() {
                            info!(target: LOG_FLOW, "verification photo discarded, recapturing");
                            requests.write(CaptureRequest {
                                purpose: CapturePurpose::Verification,
                                source: CaptureSource::Camera,
                            });
                        }
                    }
                    VerificationAction::Confirm => {
                        let address = location
                            .address
                            .clone()
                            .unwrap_or_else(|| "Unknown location".into());
                        // The flow hands out at most one outcome; a second
                        // tap in the same frame gets None and stays silent.
                        if let Some(outcome) = modal.flow.confirm(address) {
                            info!(
                                target: LOG_FLOW,
                                "verification confirmed with photo {}",
                                outcome.image.short_id()
                            );
                            finished.write(VerificationFinished { outcome });
                            modal.set_closed();
                        }
                    }
                    VerificationAction::Cancel => {
                        info!(target: LOG_FLOW, "verification cancelled");
                        modal.set_closed();
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

/// Accepts or drops verification captures depending on whether the modal is
/// still open; a capture returning after cancel must not resurrect it.
fn receive_verification_captures(
    mut completed: MessageReader<CaptureCompleted>,
    mut failed: MessageReader<CaptureFailed>,
    mut modal: ResMut<VerificationModal>,
) {
    for message in completed.read() {
        if message.purpose != CapturePurpose::Verification {
            continue;
        }
        if modal.is_closed() {
            debug!(
                target: LOG_FLOW,
                "dropping verification capture {}",
                message.image.short_id()
            );
            continue;
        }
        modal.notice = None;
        modal.flow.accept_capture(message.image.clone());
    }
    for message in failed.read() {
        if message.purpose != CapturePurpose::Verification {
            continue;
        }
        if modal.is_closed() {
            continue;
        }
        warn!(target: LOG_FLOW, "verification capture failed: {}", message.error);
        modal.notice = Some(message.error.to_string());
    }
}

fn close_verification(mut modal: ResMut<VerificationModal>) {
    if modal.is_open() {
        modal.set_closed();
    }
}

#[cfg(test)]
mod tests {
    use ecosort_core::CaptureError;
    use test_log::test;

    use super::*;

    #[derive(Resource, Default)]
    struct SeenOutcomes(Vec<String>);

    fn collect_finished(
        mut reader: MessageReader<VerificationFinished>,
        mut seen: ResMut<SeenOutcomes>,
    ) {
        for message in reader.read() {
            seen.0.push(message.outcome.location.clone());
        }
    }

    #[derive(Resource, Default)]
    struct SeenRequests(usize);

    fn collect_requests(mut reader: MessageReader<CaptureRequest>, mut seen: ResMut<SeenRequests>) {
        seen.0 += reader.read().count();
    }

    fn image() -> CaptureRef {
        CaptureRef::new("/tmp/verify.jpg", CaptureSource::Camera)
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<VerificationModal>();
        app.init_resource::<CurrentLocation>();
        app.init_resource::<SeenOutcomes>();
        app.init_resource::<SeenRequests>();
        app.add_message::<CaptureRequest>();
        app.add_message::<CaptureCompleted>();
        app.add_message::<CaptureFailed>();
        app.add_message::<VerificationFinished>();
        app.add_systems(
            Update,
            (
                receive_verification_captures,
                handle_verification_buttons,
                collect_finished.after(handle_verification_buttons),
                collect_requests.after(handle_verification_buttons),
            ),
        );
        app
    }

    fn press(app: &mut App, action: VerificationAction) -> Entity {
        app.world_mut()
            .spawn((
                Button,
                Interaction::Pressed,
                action,
                BackgroundColor(Color::WHITE),
            ))
            .id()
    }

    #[test]
    fn confirm_fires_exactly_once() {
        let mut app = test_app();
        app.world_mut().resource_mut::<CurrentLocation>().address =
            Some("Yeoksam-dong, Gangnam-gu, Seoul".into());
        {
            let mut modal = app.world_mut().resource_mut::<VerificationModal>();
            modal.set_open();
            modal.flow.accept_capture(image());
        }
        let button = press(&mut app, VerificationAction::Confirm);

        app.update();
        // Double tap: the second press observes an empty flow.
        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Pressed;
        app.update();

        assert_eq!(
            app.world().resource::<SeenOutcomes>().0,
            vec!["Yeoksam-dong, Gangnam-gu, Seoul".to_string()]
        );
        assert!(app.world().resource::<VerificationModal>().is_closed());
    }

    #[test]
    fn late_capture_after_cancel_is_dropped() {
        let mut app = test_app();
        {
            let mut modal = app.world_mut().resource_mut::<VerificationModal>();
            modal.set_open();
            // The camera is still busy when the user cancels.
            modal.set_closed();
        }
        app.world_mut().write_message(CaptureCompleted {
            purpose: CapturePurpose::Verification,
            image: image(),
        });

        app.update();
        let modal = app.world().resource::<VerificationModal>();
        assert!(modal.is_closed());
        assert!(modal.flow.pending().is_none());
    }

    #[test]
    fn capture_failure_surfaces_a_notice() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<VerificationModal>()
            .set_open();
        app.world_mut().write_message(CaptureFailed {
            purpose: CapturePurpose::Verification,
            error: CaptureError::Denied,
        });

        app.update();
        let modal = app.world().resource::<VerificationModal>();
        assert!(modal.is_open());
        assert_eq!(modal.notice.as_deref(), Some("camera permission denied"));
        assert_eq!(modal.flow.phase(), VerificationPhase::Instruction);
    }

    #[test]
    fn retake_discards_the_photo_and_requests_a_fresh_capture() {
        let mut app = test_app();
        {
            let mut modal = app.world_mut().resource_mut::<VerificationModal>();
            modal.set_open();
            modal.flow.accept_capture(image());
        }
        press(&mut app, VerificationAction::Retake);

        app.update();
        let modal = app.world().resource::<VerificationModal>();
        assert!(modal.is_open());
        assert_eq!(modal.flow.phase(), VerificationPhase::Instruction);
        assert!(app.world().resource::<SeenOutcomes>().0.is_empty());
        // Retake goes straight back to the camera.
        assert_eq!(app.world().resource::<SeenRequests>().0, 1);
    }

    #[test]
    fn confirm_without_an_address_falls_back() {
        let mut app = test_app();
        {
            let mut modal = app.world_mut().resource_mut::<VerificationModal>();
            modal.set_open();
            modal.flow.accept_capture(image());
        }
        press(&mut app, VerificationAction::Confirm);

        app.update();
        assert_eq!(
            app.world().resource::<SeenOutcomes>().0,
            vec!["Unknown location".to_string()]
        );
    }
}
