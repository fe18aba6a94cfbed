//! Transient status line. Fire-and-forget: domains send StatusEvents and
//! never wait on them.

use bevy::prelude::*;

use crate::shared::*;

/// The single status line. A newer message replaces both text and timer, so
/// the latest message always wins and expires on its own schedule.
#[derive(Resource, Debug, Default)]
pub struct StatusLine {
    pub text: String,
    timer: Option<Timer>,
}

impl StatusLine {
    pub fn is_visible(&self) -> bool {
        self.timer.is_some()
    }
}

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StatusLine>();
        app.add_systems(Update, (receive_status_events, expire_status_line).chain());
    }
}

/// System: latest StatusEvent takes the line over.
fn receive_status_events(
    mut status_events: EventReader<StatusEvent>,
    mut line: ResMut<StatusLine>,
) {
    for ev in status_events.read() {
        line.text = ev.message.clone();
        line.timer = Some(Timer::from_seconds(ev.seconds.max(0.0), TimerMode::Once));
        info!("[Status] {}", ev.message);
    }
}

/// System: clear the line when its own timer runs out.
fn expire_status_line(time: Res<Time>, mut line: ResMut<StatusLine>) {
    let Some(timer) = line.timer.as_mut() else {
        return;
    };
    timer.tick(time.delta());
    if timer.finished() {
        line.text.clear();
        line.timer = None;
    }
}
