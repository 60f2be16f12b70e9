use app::LOG_UI;
use bevy::prelude::*;

use crate::ui::components::modals_closed;
use crate::utils::cleanup;
use crate::{AppState, TabState, theme};

/// The persistent bottom tab bar. Lives for the whole signed-in session and
/// sits above every screen; modals disable it while they are open.
pub struct TabBarPlugin;

impl Plugin for TabBarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Tabs), setup_tab_bar)
            .add_systems(
                Update,
                (
                    handle_tab_buttons.run_if(modals_closed),
                    highlight_active_tab,
                )
                    .run_if(in_state(AppState::Tabs)),
            )
            .add_systems(OnExit(AppState::Tabs), cleanup::<TabBarEntity>);
    }
}

/// Marker component for tab bar entities
#[derive(Component)]
struct TabBarEntity;

#[derive(Component, Clone, Copy, PartialEq, Eq)]
struct TabButton(TabState);

#[derive(Component, Clone, Copy, PartialEq, Eq)]
struct TabLabel(TabState);

const TABS: [(TabState, &str); 4] = [
    (TabState::Home, "Home"),
    (TabState::Scan, "Scan"),
    (TabState::Area, "My Area"),
    (TabState::Profile, "Profile"),
];

fn setup_tab_bar(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                bottom: Val::Px(0.0),
                height: Val::Px(60.0),
                border: UiRect::top(Val::Px(1.0)),
                ..default()
            },
            BorderColor::all(theme::HAIRLINE),
            BackgroundColor(theme::CARD_BG),
            GlobalZIndex(5),
            TabBarEntity,
            Name::new("Tab Bar"),
        ))
        .with_children(|bar| {
            for (tab, label) in TABS {
                bar.spawn((
                    Button,
                    Node {
                        flex_grow: 1.0,
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(Color::NONE),
                    TabButton(tab),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(label),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(theme::TEXT_FAINT),
                        TabLabel(tab),
                    ));
                });
            }
        });
}

fn handle_tab_buttons(
    interactions: Query<(&Interaction, &TabButton), (Changed<Interaction>, With<Button>)>,
    active: Res<State<TabState>>,
    mut next_tab: ResMut<NextState<TabState>>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if *active.get() != button.0 {
            debug!(target: LOG_UI, "switching to the {:?} tab", button.0);
            next_tab.set(button.0);
        }
    }
}

/// Repaints the labels when the active tab changes, including the frame the
/// bar is spawned on.
fn highlight_active_tab(
    active: Res<State<TabState>>,
    mut labels: Query<(&TabLabel, &mut TextColor)>,
) {
    if !active.is_changed() {
        return;
    }
    for (label, mut color) in &mut labels {
        color.0 = if label.0 == *active.get() {
            theme::BRAND
        } else {
            theme::TEXT_FAINT
        };
    }
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
        app.add_sub_state::<TabState>();
        app.add_systems(Update, (handle_tab_buttons, highlight_active_tab));
        // One update so the sub-state comes up before any presses.
        app.update();
        app
    }

    fn press(app: &mut App, tab: TabState) {
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            TabButton(tab),
            BackgroundColor(Color::NONE),
        ));
    }

    #[test]
    fn pressing_an_inactive_tab_switches_to_it() {
        let mut app = test_app();
        assert_eq!(
            *app.world().resource::<State<TabState>>().get(),
            TabState::Home
        );

        press(&mut app, TabState::Scan);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<TabState>>().get(),
            TabState::Scan
        );
    }

    #[test]
    fn labels_repaint_when_the_tab_changes() {
        let mut app = test_app();
        for (tab, _) in TABS {
            app.world_mut().spawn((
                Text::new("label"),
                TextColor(theme::TEXT_FAINT),
                TabLabel(tab),
            ));
        }

        press(&mut app, TabState::Area);
        app.update();
        app.update();

        let mut labels = app.world_mut().query::<(&TabLabel, &TextColor)>();
        for (label, color) in labels.iter(app.world()) {
            let expected = if label.0 == TabState::Area {
                theme::BRAND
            } else {
                theme::TEXT_FAINT
            };
            assert_eq!(color.0, expected);
        }
    }
}
