//! Player domain: daily actions and their stat effects.

use bevy::prelude::*;

use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_player_actions, handle_new_day)
                .chain()
                .run_if(not(in_state(GameState::Loading))),
        );
    }
}

/// Whether an action's preconditions hold right now. A false answer means
/// "disabled", never an error.
pub fn can_perform(action: PlayerAction, player: &PlayerState, clock: &Clock) -> bool {
    match action {
        PlayerAction::GoToSchool => clock.phase == DayPhase::Morning && player.has_energy(30),
        PlayerAction::Study => clock.phase != DayPhase::Night && player.has_energy(20),
        PlayerAction::Relax => player.has_energy(5),
        PlayerAction::Sleep => true,
    }
}

/// Applies an action's stat effects. The caller has already checked
/// [`can_perform`]; energy and stress writes clamp on their own.
pub fn apply_action(action: PlayerAction, player: &mut PlayerState) {
    match action {
        PlayerAction::GoToSchool => {
            player.add_energy(-30);
            player.add_stress(10);
            player.money += 5;
        }
        PlayerAction::Study => {
            player.add_energy(-20);
            player.add_stress(15);
            player.intelligence += 2;
        }
        PlayerAction::Relax => {
            player.add_energy(-5);
            player.add_stress(-20);
        }
        PlayerAction::Sleep => {}
    }
}

/// System: run a requested action, then advance the clock.
///
/// Every action costs one phase; Sleep advances straight through to the next
/// morning, however late it is.
fn handle_player_actions(
    mut action_events: EventReader<PlayerActionEvent>,
    mut player: ResMut<PlayerState>,
    mut clock: ResMut<Clock>,
    mut new_day_writer: EventWriter<NewDayEvent>,
    mut changed_writer: EventWriter<ClockChangedEvent>,
    mut money_writer: EventWriter<MoneyChangeEvent>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for ev in action_events.read() {
        if !can_perform(ev.action, &player, &clock) {
            info!("[Player] Action {:?} not available right now", ev.action);
            continue;
        }

        apply_action(ev.action, &mut player);
        if ev.action == PlayerAction::GoToSchool {
            money_writer.send(MoneyChangeEvent {
                amount: 5,
                reason: "Pocket money for attending school".to_string(),
            });
        }

        match ev.action {
            PlayerAction::Sleep => {
                // Roll forward to the Night->Morning edge.
                while !clock.advance() {}
                new_day_writer.send(NewDayEvent {
                    day: clock.current_day,
                });
                status_writer.send(StatusEvent::new("You slept until morning."));
            }
            _ => {
                if clock.advance() {
                    new_day_writer.send(NewDayEvent {
                        day: clock.current_day,
                    });
                }
            }
        }
        changed_writer.send(ClockChangedEvent);
        info!(
            "[Player] {:?} done. Now {} (energy {}, stress {})",
            ev.action,
            clock.date_string(),
            player.energy(),
            player.stress()
        );
    }
}

/// System: morning refresh — energy back to full.
fn handle_new_day(
    mut new_day_events: EventReader<NewDayEvent>,
    mut player: ResMut<PlayerState>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for ev in new_day_events.read() {
        player.set_energy(MAX_ENERGY);
        status_writer.send(StatusEvent::new(format!(
            "Day {} begins. You feel rested.",
            ev.day
        )));
    }
}
