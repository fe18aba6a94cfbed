mod shared;
mod clock;
mod player;
mod npcs;
mod economy;
mod save;
mod data;
mod feedback;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;

use shared::*;

fn main() {
    App::new()
        // Headless core: no window, no renderer. A frontend embeds the same
        // plugin set and drives it through events.
        .add_plugins(
            MinimalPlugins
                .set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(50))),
        )
        .add_plugins(StatesPlugin)
        .add_plugins(LogPlugin::default())
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Clock>()
        .init_resource::<WeatherState>()
        .init_resource::<PlayerState>()
        .init_resource::<ItemCatalog>()
        .init_resource::<LocationCatalog>()
        .init_resource::<CurrentLocation>()
        .init_resource::<NpcRegistry>()
        .init_resource::<ActiveDialogue>()
        .init_resource::<DataIntegrityReport>()
        // Events
        .add_event::<AdvanceTimeEvent>()
        .add_event::<NewDayEvent>()
        .add_event::<ClockChangedEvent>()
        .add_event::<PlayerActionEvent>()
        .add_event::<TravelEvent>()
        .add_event::<BackToMapEvent>()
        .add_event::<DialogueStartEvent>()
        .add_event::<DialogueChoiceEvent>()
        .add_event::<DialogueEndedEvent>()
        .add_event::<DialogueIntegrityEvent>()
        .add_event::<BuyRequestEvent>()
        .add_event::<MoneyChangeEvent>()
        .add_event::<StatusEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>()
        // Domain plugins
        .add_plugins(clock::ClockPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(feedback::FeedbackPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .run();
}
