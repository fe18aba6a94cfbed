//! Clock domain: day/phase progression and the daily weather roll.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (advance_time, roll_daily_weather)
                .chain()
                .run_if(not(in_state(GameState::Loading))),
        );
    }
}

/// System: consume AdvanceTimeEvents and step the clock one phase per event.
pub fn advance_time(
    mut advance_events: EventReader<AdvanceTimeEvent>,
    mut clock: ResMut<Clock>,
    mut new_day_writer: EventWriter<NewDayEvent>,
    mut changed_writer: EventWriter<ClockChangedEvent>,
) {
    let mut stepped = false;
    for _ in advance_events.read() {
        stepped = true;
        if clock.advance() {
            info!("[Clock] New day: {}", clock.date_string());
            new_day_writer.send(NewDayEvent {
                day: clock.current_day,
            });
        }
    }
    if stepped {
        changed_writer.send(ClockChangedEvent);
    }
}

/// System: refresh the weather once per new day.
pub fn roll_daily_weather(
    mut new_day_events: EventReader<NewDayEvent>,
    mut weather: ResMut<WeatherState>,
) {
    for ev in new_day_events.read() {
        let rolled = roll_weather(&mut rand::thread_rng());
        info!("[Clock] Day {} weather: {}", ev.day, rolled);
        weather.current = rolled.to_string();
    }
}

/// Weighted daily roll: 70% Sunny, 20% Rainy, 10% Stormy.
pub fn roll_weather(rng: &mut impl Rng) -> &'static str {
    let roll: u32 = rng.gen_range(0..100);
    match roll {
        0..=69 => "Sunny",
        70..=89 => "Rainy",
        _ => "Stormy",
    }
}
