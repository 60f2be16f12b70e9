use app::LOG_FLOW;
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use ecosort_core::RewardEvent;
use ecosort_core::anim::STAR_COUNT;

use crate::ui::components::{RewardModal, RewardSource};
use crate::utils::cleanup;
use crate::{AppState, theme};

/// Emitted when the user collects the reward and the modal closes.
#[derive(Message, Debug, Clone, Copy)]
pub struct RewardDismissed {
    pub source: RewardSource,
}

/// The celebration overlay: entrance spring and fade, points counting up,
/// then staggered star reveals. All driven by the modal's timeline.
pub struct RewardModalPlugin;

impl Plugin for RewardModalPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RewardDismissed>()
            .add_systems(
                Update,
                (show_reward_modal, animate_reward, handle_collect_button)
                    .chain()
                    .run_if(in_state(AppState::Tabs)),
            )
            .add_systems(OnExit(AppState::Tabs), (close_reward, cleanup::<RewardUI>));
    }
}

/// Marker component for reward modal entities
#[derive(Component)]
struct RewardUI;

/// The full-screen dim layer behind the card.
#[derive(Component)]
struct RewardBackdrop;

#[derive(Component)]
struct RewardCard;

#[derive(Component)]
struct RewardPointsText;

/// One star in the reveal row, by reveal order.
#[derive(Component)]
struct RewardStar(usize);

#[derive(Component)]
struct CollectButton;

/// Spawns the overlay when the modal opens and tears it down when it closes.
///
/// The timeline marks the resource changed on every animation frame, so the
/// overlay is only built while none exists yet.
fn show_reward_modal(
    mut commands: Commands,
    modal: Res<RewardModal>,
    existing: Query<Entity, With<RewardUI>>,
) {
    if !modal.is_changed() {
        return;
    }
    if modal.is_closed() {
        for entity in &existing {
            commands.entity(entity).despawn();
        }
        return;
    }
    if !existing.is_empty() {
        return;
    }
    let Some(event) = modal.event() else {
        return;
    };
    spawn_reward_modal(&mut commands, event);
}

fn spawn_reward_modal(commands: &mut Commands, event: &RewardEvent) {
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
            // Transparent until the fade brings it in.
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
            GlobalZIndex(60),
            RewardUI,
            RewardBackdrop,
            Name::new("Reward Modal"),
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        width: Val::Px(340.0),
                        top: Val::Px(24.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.0),
                        padding: UiRect::all(Val::Px(24.0)),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(16.0)),
                    BackgroundColor(Color::WHITE.with_alpha(0.0)),
                    RewardCard,
                ))
                .with_children(|card| {
                    card.spawn((
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
                    .with_children(|badge| {
                        badge.spawn((
                            Text::new("P"),
                            TextFont {
                                font_size: 22.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });

                    card.spawn((
                        Text::new(if event.correct {
                            "Great job!"
                        } else {
                            "Disposal recorded"
                        }),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_PRIMARY),
                    ));
                    card.spawn((
                        Text::new(event.waste_label.clone()),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_SECONDARY),
                    ));

                    card.spawn((
                        Text::new("+0 P"),
                        TextFont {
                            font_size: 32.0,
                            ..default()
                        },
                        TextColor(theme::BRAND),
                        RewardPointsText,
                    ));

                    spawn_star_row(card);

                    if let Some(level) = event.new_level {
                        card.spawn((
                            Text::new(format!("Level up! Lv {level}")),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(theme::BRAND_DARK),
                        ));
                    }
                    if let Some(achievement) = &event.achievement {
                        card.spawn((
                            Text::new(format!("{} unlocked", achievement.title)),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(theme::TEXT_SECONDARY),
                        ));
                    }

                    spawn_stat_row(card, event);

                    card.spawn((
                        Button,
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            margin: UiRect::top(Val::Px(4.0)),
                            ..default()
                        },
                        BorderRadius::all(Val::Px(10.0)),
                        BackgroundColor(theme::BRAND),
                        CollectButton,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("Collect points"),
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

/// Tally line under the celebration: this disposal and, when correct, the
/// accuracy count each move by one.
fn spawn_stat_row(card: &mut RelatedSpawnerCommands<ChildOf>, event: &RewardEvent) {
    card.spawn(Node {
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        column_gap: Val::Px(20.0),
        margin: UiRect::top(Val::Px(4.0)),
        ..default()
    })
    .with_children(|row| {
        spawn_stat(row, "+1", "Disposals");
        row.spawn((
            Node {
                width: Val::Px(1.0),
                height: Val::Px(28.0),
                ..default()
            },
            BackgroundColor(theme::HAIRLINE),
        ));
        spawn_stat(row, if event.correct { "+1" } else { "+0" }, "Accuracy");
    });
}

fn spawn_stat(row: &mut RelatedSpawnerCommands<ChildOf>, value: &str, label: &str) {
    row.spawn(Node {
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        ..default()
    })
    .with_children(|stat| {
        stat.spawn((
            Text::new(value),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(theme::BRAND),
        ));
        stat.spawn((
            Text::new(label),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(theme::TEXT_SECONDARY),
        ));
    });
}

fn spawn_star_row(card: &mut RelatedSpawnerCommands<ChildOf>) {
    card.spawn(Node {
        column_gap: Val::Px(10.0),
        ..default()
    })
    .with_children(|row| {
        for index in 0..STAR_COUNT {
            // Fixed slot so the row keeps its shape while stars grow in.
            row.spawn(Node {
                width: Val::Px(28.0),
                height: Val::Px(28.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|slot| {
                slot.spawn((
                    Node {
                        width: Val::Px(0.0),
                        height: Val::Px(0.0),
                        ..default()
                    },
                    BorderRadius::all(Val::Px(14.0)),
                    BackgroundColor(theme::STAR_GOLD),
                    Visibility::Hidden,
                    RewardStar(index),
                ));
            });
        }
    });
}

/// Advances the timeline and maps its values onto the spawned nodes.
fn animate_reward(
    time: Res<Time>,
    mut modal: ResMut<RewardModal>,
    mut backdrops: Query<&mut BackgroundColor, (With<RewardBackdrop>, Without<RewardCard>)>,
    mut cards: Query<
        (&mut Node, &mut BackgroundColor),
        (With<RewardCard>, Without<RewardBackdrop>, Without<RewardStar>),
    >,
    mut points: Query<&mut Text, With<RewardPointsText>>,
    mut stars: Query<
        (&RewardStar, &mut Node, &mut Visibility),
        (With<RewardStar>, Without<RewardCard>),
    >,
) {
    if modal.is_closed() {
        return;
    }
    modal.timeline.tick(time.delta_secs());

    let opacity = modal.timeline.opacity();
    let scale = modal.timeline.scale();

    for mut color in &mut backdrops {
        *color = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5 * opacity));
    }
    // The spring overshoots slightly past 1; the card slides up through the
    // last few pixels instead of scaling, which reads the same at this size.
    for (mut node, mut color) in &mut cards {
        node.top = Val::Px(24.0 * (1.0 - scale.min(1.0)));
        *color = BackgroundColor(Color::WHITE.with_alpha(opacity));
    }

    let shown = format!("+{} P", modal.timeline.points_shown());
    for mut text in &mut points {
        if text.0 != shown {
            text.0 = shown.clone();
        }
    }

    for (star, mut node, mut visibility) in &mut stars {
        let progress = modal.timeline.star_progress(star.0).min(1.2);
        let size = 28.0 * progress;
        node.width = Val::Px(size);
        node.height = Val::Px(size);
        let target = if progress > 0.001 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != target {
            *visibility = target;
        }
    }
}

fn handle_collect_button(
    mut interactions: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<CollectButton>),
    >,
    mut modal: ResMut<RewardModal>,
    mut dismissed: MessageWriter<RewardDismissed>,
) {
    for (interaction, mut color) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                *color = theme::BRAND_PRESSED.into();
                if modal.is_closed() {
                    continue;
                }
                let source = modal.source();
                info!(target: LOG_FLOW, "reward collected");
                dismissed.write(RewardDismissed { source });
                modal.set_closed();
            }
            Interaction::Hovered => {
                *color = theme::BRAND_DARK.into();
            }
            Interaction::None => {
                *color = theme::BRAND.into();
            }
        }
    }
}

fn close_reward(mut modal: ResMut<RewardModal>) {
    if modal.is_open() {
        modal.set_closed();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use test_log::test;

    use super::*;

    #[derive(Resource, Default)]
    struct SeenDismissals(Vec<RewardSource>);

    fn collect_dismissals(
        mut reader: MessageReader<RewardDismissed>,
        mut seen: ResMut<SeenDismissals>,
    ) {
        for message in reader.read() {
            seen.0.push(message.source);
        }
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.init_resource::<RewardModal>();
        app.init_resource::<SeenDismissals>();
        app.add_message::<RewardDismissed>();
        app.add_systems(
            Update,
            (
                show_reward_modal,
                animate_reward,
                handle_collect_button,
                collect_dismissals,
            )
                .chain(),
        );
        app
    }

    fn advance(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    /// Frame-sized steps so stage transitions land the way they do live.
    fn run_frames(app: &mut App, secs: f32) {
        let mut left = secs;
        while left > 0.0 {
            advance(app, 1.0 / 60.0);
            left -= 1.0 / 60.0;
        }
    }

    fn count<C: Component>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<Entity, With<C>>();
        query.iter(app.world()).count()
    }

    fn open(app: &mut App) {
        app.world_mut()
            .resource_mut::<RewardModal>()
            .set_open(RewardEvent::for_verification(), RewardSource::Verification);
    }

    #[test]
    fn opening_builds_one_overlay_and_plays_through() {
        let mut app = test_app();
        open(&mut app);

        app.update();
        assert_eq!(count::<RewardUI>(&mut app), 1);

        // Animation frames keep marking the resource changed; still one
        // overlay.
        run_frames(&mut app, 0.5);
        assert_eq!(count::<RewardUI>(&mut app), 1);

        run_frames(&mut app, 12.0);
        assert!(app.world().resource::<RewardModal>().timeline.is_settled());

        let mut points = app
            .world_mut()
            .query_filtered::<&Text, With<RewardPointsText>>();
        let text = points.single(app.world()).unwrap();
        assert_eq!(text.0, "+15 P");
    }

    #[test]
    fn stars_stay_hidden_until_their_stage() {
        let mut app = test_app();
        open(&mut app);
        app.update();

        // Still in the entrance: counter at zero, stars hidden.
        run_frames(&mut app, 0.1);
        let mut stars = app
            .world_mut()
            .query_filtered::<&Visibility, With<RewardStar>>();
        for visibility in stars.iter(app.world()) {
            assert_eq!(*visibility, Visibility::Hidden);
        }

        run_frames(&mut app, 12.0);
        let mut stars = app
            .world_mut()
            .query_filtered::<(&Visibility, &Node), With<RewardStar>>();
        for (visibility, node) in stars.iter(app.world()) {
            assert_eq!(*visibility, Visibility::Inherited);
            assert!(matches!(node.width, Val::Px(w) if (w - 28.0).abs() < 1.0));
        }
    }

    #[test]
    fn collecting_dismisses_and_tears_down() {
        let mut app = test_app();
        open(&mut app);
        app.update();

        let mut buttons = app
            .world_mut()
            .query_filtered::<Entity, With<CollectButton>>();
        let button = buttons.single(app.world()).unwrap();
        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Pressed;
        app.update();

        assert_eq!(
            app.world().resource::<SeenDismissals>().0,
            vec![RewardSource::Verification]
        );
        let modal = app.world().resource::<RewardModal>();
        assert!(modal.is_closed());
        // Hiding resets the whole timeline for the next replay.
        assert_eq!(modal.timeline.points_shown(), 0);

        app.update();
        assert_eq!(count::<RewardUI>(&mut app), 0);
    }
}
