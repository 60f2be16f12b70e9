use std::sync::Arc;

use app::{LOG_FLOW, LOG_UI};
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_config::Simulation;
use ecosort_core::{
    AnalysisProvider, AnalysisResult, CannedAnalysis, CaptureRef, CaptureSource, RewardEvent,
};

use crate::platform::{CaptureCompleted, CaptureFailed, CapturePurpose, CaptureRequest};
use crate::ui::components::{
    HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, RewardModal, RewardSource, modals_closed,
};
use crate::ui::modals::RewardDismissed;
use crate::utils::cleanup;
use crate::{AppState, TabState, theme};

/// Plugin for the scan tab: capture, simulated analysis, disposal guidance.
pub struct ScanScenePlugin;

impl Plugin for ScanScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScanSession>()
            .init_resource::<AnalysisBackend>()
            .init_resource::<AnalysisClock>()
            .init_resource::<ScanNotice>()
            .init_resource::<CameraFacing>()
            .add_systems(OnEnter(TabState::Scan), setup_scan)
            .add_systems(
                Update,
                (
                    handle_scan_buttons.run_if(modals_closed),
                    on_scan_capture,
                    tick_analysis,
                    on_reward_dismissed,
                    refresh_scan_view,
                    animate_analysis_hint,
                )
                    .chain()
                    .run_if(in_state(TabState::Scan)),
            )
            .add_systems(OnExit(TabState::Scan), cleanup::<ScanEntity>)
            .add_systems(OnExit(AppState::Tabs), reset_scan_state);
    }
}

/// Where the scan screen is in its capture-and-analyze round trip.
///
/// Survives tab switches; its timers only advance while the tab is active.
#[derive(Resource, Default)]
pub enum ScanSession {
    #[default]
    Idle,
    /// Waiting for the simulated camera or library to deliver an image.
    Requesting,
    /// Analysis delay running for a delivered image.
    Analyzing { image: CaptureRef },
    Complete {
        image: CaptureRef,
        result: AnalysisResult,
    },
}

/// The analysis seam. Swapping the provider changes what scans resolve to
/// without touching any presentation code; tests insert a deterministic one.
#[derive(Resource)]
pub struct AnalysisBackend(pub Arc<dyn AnalysisProvider>);

impl Default for AnalysisBackend {
    fn default() -> Self {
        Self(Arc::new(CannedAnalysis))
    }
}

/// Running analysis delay. Kept apart from the session so per-frame ticking
/// does not retrigger the view rebuild.
#[derive(Resource, Default)]
struct AnalysisClock(Option<Timer>);

/// Platform failure line shown under the viewfinder.
#[derive(Resource, Default)]
struct ScanNotice(Option<String>);

/// Which way the simulated camera points. Cosmetic; both directions deliver
/// the same canned captures.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq)]
enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    fn label(self) -> &'static str {
        match self {
            CameraFacing::Back => "Back camera",
            CameraFacing::Front => "Front camera",
        }
    }

    fn flipped(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

/// Marker component for scan screen entities
#[derive(Component)]
struct ScanEntity;

/// Marker for the pulsing analysis status line.
#[derive(Component)]
struct AnalyzingHint;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum ScanAction {
    Capture,
    Library,
    ToggleFacing,
    Retake,
    CompleteDisposal,
}

fn setup_scan(
    mut commands: Commands,
    session: Res<ScanSession>,
    notice: Res<ScanNotice>,
    facing: Res<CameraFacing>,
) {
    debug!(target: LOG_UI, "showing scan screen");
    spawn_scan_ui(&mut commands, &session, &notice, &facing);
}

/// Rebuilds the screen whenever the session, the notice or the facing
/// changes. Mutations only happen on taps and deliveries, so this stays
/// quiet between them.
fn refresh_scan_view(
    mut commands: Commands,
    session: Res<ScanSession>,
    notice: Res<ScanNotice>,
    facing: Res<CameraFacing>,
    existing: Query<Entity, With<ScanEntity>>,
) {
    if !(session.is_changed() || notice.is_changed() || facing.is_changed()) {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    spawn_scan_ui(&mut commands, &session, &notice, &facing);
}

fn spawn_scan_ui(
    commands: &mut Commands,
    session: &ScanSession,
    notice: &ScanNotice,
    facing: &CameraFacing,
) {
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
            ScanEntity,
            Name::new("Scan Screen"),
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
                    // Header with the facing toggle
                    content
                        .spawn(Node {
                            width: Val::Percent(100.0),
                            justify_content: JustifyContent::SpaceBetween,
                            align_items: AlignItems::Center,
                            ..default()
                        })
                        .with_children(|header| {
                            header.spawn((
                                Text::new("AI Waste Scan"),
                                TextFont {
                                    font_size: 22.0,
                                    ..default()
                                },
                                TextColor(theme::TEXT_PRIMARY),
                            ));
                            header
                                .spawn((
                                    Button,
                                    Node {
                                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                                        ..default()
                                    },
                                    BorderRadius::all(Val::Px(12.0)),
                                    BackgroundColor(NORMAL_BUTTON),
                                    ScanAction::ToggleFacing,
                                ))
                                .with_children(|chip| {
                                    chip.spawn((
                                        Text::new(facing.label()),
                                        TextFont {
                                            font_size: 12.0,
                                            ..default()
                                        },
                                        TextColor(theme::TEXT_SECONDARY),
                                    ));
                                });
                        });

                    match session {
                        ScanSession::Idle => {
                            spawn_viewfinder(content, notice, "Point the camera at your waste item", true);
                        }
                        ScanSession::Requesting => {
                            spawn_viewfinder(content, notice, "Opening camera...", false);
                        }
                        ScanSession::Analyzing { image } => spawn_analyzing(content, image),
                        ScanSession::Complete { image, result } => {
                            spawn_result(content, image, result);
                        }
                    }
                });
        });
}

fn spawn_viewfinder(
    content: &mut RelatedSpawnerCommands<ChildOf>,
    notice: &ScanNotice,
    hint: &str,
    show_controls: bool,
) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(340.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BorderRadius::all(Val::Px(16.0)),
            BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
        ))
        .with_children(|finder| {
            // Reticle
            finder.spawn((
                Node {
                    width: Val::Px(180.0),
                    height: Val::Px(180.0),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.25)),
                BorderRadius::all(Val::Px(12.0)),
            ));
            finder.spawn((
                Text::new(hint),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            ));
            if let Some(notice) = &notice.0 {
                finder.spawn((
                    Text::new(notice.clone()),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(theme::ALERT),
                ));
            }
        });

    if !show_controls {
        return;
    }

    content
        .spawn(Node {
            width: Val::Percent(100.0),
            justify_content: JustifyContent::SpaceEvenly,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|controls| {
            controls
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(14.0), Val::Px(10.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(10.0)),
                    BackgroundColor(NORMAL_BUTTON),
                    ScanAction::Library,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("From library"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_SECONDARY),
                    ));
                });

            // Shutter
            controls.spawn((
                Button,
                Node {
                    width: Val::Px(72.0),
                    height: Val::Px(72.0),
                    border: UiRect::all(Val::Px(4.0)),
                    ..default()
                },
                BorderColor::all(theme::BRAND),
                BorderRadius::all(Val::Px(36.0)),
                BackgroundColor(Color::WHITE),
                ScanAction::Capture,
            ));

            // Spacer balancing the library button
            controls.spawn(Node {
                width: Val::Px(110.0),
                ..default()
            });
        });
}

fn spawn_analyzing(content: &mut RelatedSpawnerCommands<ChildOf>, image: &CaptureRef) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(340.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BorderRadius::all(Val::Px(16.0)),
            BackgroundColor(theme::BRAND_TINT),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(format!(
                    "Photo {} · {}",
                    image.short_id(),
                    image.source().label()
                )),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme::TEXT_SECONDARY),
            ));
            panel.spawn((
                Text::new("AI is analyzing your photo."),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
                AnalyzingHint,
            ));
            panel.spawn((
                Text::new("Sorting guidance arrives in a moment"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(theme::TEXT_FAINT),
            ));
        });
}

fn spawn_result(
    content: &mut RelatedSpawnerCommands<ChildOf>,
    image: &CaptureRef,
    result: &AnalysisResult,
) {
    content
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                padding: UiRect::all(Val::Px(18.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(16.0)),
            BackgroundColor(theme::CARD_BG),
        ))
        .with_children(|card| {
            card.spawn(Node {
                column_gap: Val::Px(8.0),
                ..default()
            })
            .with_children(|chips| {
                chips
                    .spawn((
                        Node {
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(10.0)),
                        BackgroundColor(category_color(&result.category)),
                    ))
                    .with_children(|chip| {
                        chip.spawn((
                            Text::new(result.category.clone()),
                            TextFont {
                                font_size: 12.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
                chips
                    .spawn((
                        Node {
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(10.0)),
                        BackgroundColor(theme::BRAND_TINT),
                    ))
                    .with_children(|chip| {
                        chip.spawn((
                            Text::new(format!("{}% match", result.confidence)),
                            TextFont {
                                font_size: 12.0,
                                ..default()
                            },
                            TextColor(theme::BRAND),
                        ));
                    });
            });

            card.spawn((
                Text::new(result.item.clone()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));

            card.spawn((
                Text::new("How to dispose"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(theme::TEXT_SECONDARY),
            ));

            for (index, step) in result.instructions.iter().enumerate() {
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
                        Text::new(step.clone()),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));
                });
            }

            card.spawn((
                Node {
                    width: Val::Percent(100.0),
                    padding: UiRect::all(Val::Px(10.0)),
                    ..default()
                },
                BorderRadius::all(Val::Px(8.0)),
                BackgroundColor(theme::TIP_BG),
            ))
            .with_children(|tip| {
                tip.spawn((
                    Text::new(format!("Tip: {}", result.tips)),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(theme::TEXT_PRIMARY),
                ));
            });

            card.spawn((
                Text::new(format!(
                    "Photo {} · {}",
                    image.short_id(),
                    image.source().label()
                )),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(theme::TEXT_FAINT),
            ));

            card.spawn(Node {
                width: Val::Percent(100.0),
                column_gap: Val::Px(10.0),
                margin: UiRect::top(Val::Px(6.0)),
                ..default()
            })
            .with_children(|buttons| {
                buttons
                    .spawn((
                        Button,
                        Node {
                            flex_grow: 1.0,
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BorderColor::all(theme::HAIRLINE),
                        BorderRadius::all(Val::Px(10.0)),
                        BackgroundColor(NORMAL_BUTTON),
                        ScanAction::Retake,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("Scan again"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_SECONDARY),
                        ));
                    });
                buttons
                    .spawn((
                        Button,
                        Node {
                            flex_grow: 1.0,
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BorderRadius::all(Val::Px(10.0)),
                        BackgroundColor(theme::BRAND),
                        ScanAction::CompleteDisposal,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("Disposal complete"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            });
        });
}

fn category_color(category: &str) -> Color {
    match category {
        "Plastic" => theme::BRAND,
        "Paper" => Color::srgb(0.129, 0.588, 0.953),
        _ => theme::TEXT_SECONDARY,
    }
}

fn button_palette(action: ScanAction) -> (Color, Color, Color) {
    match action {
        ScanAction::CompleteDisposal => (theme::BRAND, theme::BRAND_DARK, theme::BRAND_PRESSED),
        ScanAction::Capture => (Color::WHITE, theme::BRAND_TINT, theme::BRAND_TINT),
        _ => (NORMAL_BUTTON, HOVERED_BUTTON, PRESSED_BUTTON),
    }
}

fn handle_scan_buttons(
    mut interactions: Query<
        (&Interaction, &ScanAction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut session: ResMut<ScanSession>,
    mut notice: ResMut<ScanNotice>,
    mut facing: ResMut<CameraFacing>,
    mut reward: ResMut<RewardModal>,
    mut requests: MessageWriter<CaptureRequest>,
) {
    for (interaction, action, mut color) in &mut interactions {
        let (normal, hovered, pressed) = button_palette(*action);
        match *interaction {
            Interaction::Pressed => {
                *color = pressed.into();
                match action {
                    ScanAction::ToggleFacing => {
                        let next = facing.flipped();
                        *facing = next;
                    }
                    ScanAction::Capture | ScanAction::Library => {
                        // One capture in flight at a time.
                        if !matches!(*session, ScanSession::Idle) {
                            continue;
                        }
                        let source = if matches!(action, ScanAction::Capture) {
                            CaptureSource::Camera
                        } else {
                            CaptureSource::Library
                        };
                        if notice.0.is_some() {
                            notice.0 = None;
                        }
                        info!(target: LOG_FLOW, "scan capture requested via {}", source.label());
                        requests.write(CaptureRequest {
                            purpose: CapturePurpose::Scan,
                            source,
                        });
                        *session = ScanSession::Requesting;
                    }
                    ScanAction::Retake => {
                        info!(target: LOG_FLOW, "scan session reset for another attempt");
                        *session = ScanSession::Idle;
                    }
                    ScanAction::CompleteDisposal => {
                        if let ScanSession::Complete { result, .. } = &*session {
                            let event = RewardEvent::for_analysis(result);
                            info!(
                                target: LOG_FLOW,
                                "disposal completed: {} (+{} P)",
                                event.waste_label,
                                event.points_earned
                            );
                            reward.set_open(event, RewardSource::Scan);
                        }
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

fn on_scan_capture(
    mut completed: MessageReader<CaptureCompleted>,
    mut failed: MessageReader<CaptureFailed>,
    mut session: ResMut<ScanSession>,
    mut notice: ResMut<ScanNotice>,
    mut clock: ResMut<AnalysisClock>,
    simulation: Res<Simulation>,
) {
    for message in completed.read() {
        if message.purpose != CapturePurpose::Scan {
            continue;
        }
        info!(target: LOG_FLOW, "analyzing capture {}", message.image.short_id());
        clock.0 = Some(Timer::from_seconds(
            simulation.analysis_delay_secs,
            TimerMode::Once,
        ));
        *session = ScanSession::Analyzing {
            image: message.image.clone(),
        };
    }
    for message in failed.read() {
        if message.purpose != CapturePurpose::Scan {
            continue;
        }
        warn!(target: LOG_FLOW, "scan capture failed: {}", message.error);
        notice.0 = Some(message.error.to_string());
        *session = ScanSession::Idle;
    }
}

fn tick_analysis(
    time: Res<Time>,
    backend: Res<AnalysisBackend>,
    mut clock: ResMut<AnalysisClock>,
    mut session: ResMut<ScanSession>,
    mut notice: ResMut<ScanNotice>,
) {
    if !matches!(*session, ScanSession::Analyzing { .. }) {
        return;
    }
    let Some(timer) = clock.0.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    clock.0 = None;

    let ScanSession::Analyzing { image } = &*session else {
        return;
    };
    let image = image.clone();
    match backend.0.analyze(&image) {
        Ok(result) => {
            info!(
                target: LOG_FLOW,
                "analysis result: {} ({}% match)",
                result.item,
                result.confidence
            );
            *session = ScanSession::Complete { image, result };
        }
        Err(err) => {
            warn!(target: LOG_FLOW, "analysis failed: {err}");
            notice.0 = Some(err.to_string());
            *session = ScanSession::Idle;
        }
    }
}

fn animate_analysis_hint(
    time: Res<Time>,
    session: Res<ScanSession>,
    mut hints: Query<&mut Text, With<AnalyzingHint>>,
) {
    if !matches!(*session, ScanSession::Analyzing { .. }) {
        return;
    }
    let dots = 1 + (time.elapsed_secs() * 2.0) as usize % 3;
    for mut text in &mut hints {
        let next = format!("AI is analyzing your photo{}", ".".repeat(dots));
        if text.0 != next {
            text.0 = next;
        }
    }
}

fn on_reward_dismissed(
    mut dismissed: MessageReader<RewardDismissed>,
    mut session: ResMut<ScanSession>,
) {
    for message in dismissed.read() {
        if message.source != RewardSource::Scan {
            continue;
        }
        if !matches!(*session, ScanSession::Idle) {
            info!(target: LOG_FLOW, "scan session reset after collecting the reward");
            *session = ScanSession::Idle;
        }
    }
}

/// Signing out drops the whole scan session.
fn reset_scan_state(
    mut session: ResMut<ScanSession>,
    mut notice: ResMut<ScanNotice>,
    mut clock: ResMut<AnalysisClock>,
) {
    *session = ScanSession::Idle;
    notice.0 = None;
    clock.0 = None;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ecosort_core::{CaptureError, FixedAnalysis, analysis::canned_results};
    use test_log::test;

    use super::*;

    #[derive(Resource, Default)]
    struct SeenRequests(Vec<CapturePurpose>);

    fn collect_requests(mut reader: MessageReader<CaptureRequest>, mut seen: ResMut<SeenRequests>) {
        for message in reader.read() {
            seen.0.push(message.purpose);
        }
    }

    fn image() -> CaptureRef {
        CaptureRef::new("/tmp/scan.jpg", CaptureSource::Camera)
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.insert_resource(Simulation::default());
        app.init_resource::<ScanSession>();
        app.init_resource::<ScanNotice>();
        app.init_resource::<AnalysisClock>();
        app.insert_resource(AnalysisBackend(Arc::new(FixedAnalysis(0))));
        app.add_message::<CaptureRequest>();
        app.add_message::<CaptureCompleted>();
        app.add_message::<CaptureFailed>();
        app.add_message::<RewardDismissed>();
        app.add_systems(
            Update,
            (on_scan_capture, tick_analysis, on_reward_dismissed).chain(),
        );
        app
    }

    fn advance(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    #[test]
    fn delivered_capture_analyzes_after_the_delay() {
        let mut app = test_app();
        app.world_mut().write_message(CaptureCompleted {
            purpose: CapturePurpose::Scan,
            image: image(),
        });

        app.update();
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Analyzing { .. }
        ));

        // Default analysis delay is 2 s.
        advance(&mut app, 1.9);
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Analyzing { .. }
        ));

        advance(&mut app, 0.2);
        let session = app.world().resource::<ScanSession>();
        let ScanSession::Complete { result, .. } = session else {
            panic!("expected a completed scan, got something else");
        };
        assert_eq!(result.item, "Plastic bottle");
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn verification_captures_do_not_touch_the_scan_session() {
        let mut app = test_app();
        app.world_mut().write_message(CaptureCompleted {
            purpose: CapturePurpose::Verification,
            image: image(),
        });

        app.update();
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Idle
        ));
    }

    #[test]
    fn failed_capture_reports_and_returns_to_idle() {
        let mut app = test_app();
        *app.world_mut().resource_mut::<ScanSession>() = ScanSession::Requesting;
        app.world_mut().write_message(CaptureFailed {
            purpose: CapturePurpose::Scan,
            error: CaptureError::Denied,
        });

        app.update();
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Idle
        ));
        assert_eq!(
            app.world().resource::<ScanNotice>().0.as_deref(),
            Some("camera permission denied")
        );
    }

    #[test]
    fn collecting_the_reward_resets_the_session() {
        let mut app = test_app();
        *app.world_mut().resource_mut::<ScanSession>() = ScanSession::Complete {
            image: image(),
            result: canned_results()[0].clone(),
        };
        app.world_mut().write_message(RewardDismissed {
            source: RewardSource::Scan,
        });

        app.update();
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Idle
        ));
    }

    #[test]
    fn verification_rewards_leave_the_scan_alone() {
        let mut app = test_app();
        *app.world_mut().resource_mut::<ScanSession>() = ScanSession::Complete {
            image: image(),
            result: canned_results()[0].clone(),
        };
        app.world_mut().write_message(RewardDismissed {
            source: RewardSource::Verification,
        });

        app.update();
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Complete { .. }
        ));
    }

    #[test]
    fn capture_only_fires_from_idle() {
        let mut app = test_app();
        app.init_resource::<CameraFacing>();
        app.init_resource::<RewardModal>();
        app.init_resource::<SeenRequests>();
        app.add_systems(
            Update,
            (handle_scan_buttons, collect_requests.after(handle_scan_buttons)),
        );
        let button = app
            .world_mut()
            .spawn((
                Button,
                Interaction::Pressed,
                ScanAction::Capture,
                BackgroundColor(Color::WHITE),
            ))
            .id();

        app.update();
        // Re-tap while the camera is already opening.
        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Pressed;
        app.update();

        assert_eq!(app.world().resource::<SeenRequests>().0.len(), 1);
        assert!(matches!(
            *app.world().resource::<ScanSession>(),
            ScanSession::Requesting
        ));
    }
}
