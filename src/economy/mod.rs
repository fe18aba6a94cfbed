//! Economy domain: the shop purchase flow.

use bevy::prelude::*;

use crate::shared::*;

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_buy.run_if(not(in_state(GameState::Loading))),
        );
    }
}

pub fn can_afford(player: &PlayerState, item: &ItemDef) -> bool {
    player.money >= item.cost as i32
}

/// System: process BuyRequestEvents — the core purchase flow.
/// Unknown ids and thin wallets degrade to a status message.
pub fn handle_buy(
    mut buy_events: EventReader<BuyRequestEvent>,
    mut player: ResMut<PlayerState>,
    catalog: Res<ItemCatalog>,
    mut money_writer: EventWriter<MoneyChangeEvent>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for ev in buy_events.read() {
        let Some(item) = catalog.get(&ev.item_id) else {
            warn!("[Economy] Buy failed, unknown item '{}'", ev.item_id);
            status_writer.send(StatusEvent::new("That item is not for sale."));
            continue;
        };

        if !can_afford(&player, item) {
            info!(
                "[Economy] Cannot afford '{}' (costs {}, have {})",
                item.id, item.cost, player.money
            );
            status_writer.send(StatusEvent::new(format!(
                "Not enough money for {}.",
                item.name
            )));
            continue;
        }

        player.money -= item.cost as i32;
        player.add_item(item.id.clone());

        money_writer.send(MoneyChangeEvent {
            amount: -(item.cost as i32),
            reason: format!("Bought {}", item.name),
        });
        status_writer.send(StatusEvent::new(format!("Bought {}.", item.name)));
        info!(
            "[Economy] Bought '{}' for {}. Remaining money: {}",
            item.id, item.cost, player.money
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flowers() -> ItemDef {
        ItemDef {
            id: "mazzo_di_fiori".to_string(),
            name: "Mazzo di fiori".to_string(),
            description: "Un mazzo di fiori freschi.".to_string(),
            cost: 15,
            icon_path: None,
        }
    }

    #[test]
    fn affordability_is_a_simple_threshold() {
        let mut player = PlayerState::default();
        assert!(can_afford(&player, &flowers()));
        player.money = 14;
        assert!(!can_afford(&player, &flowers()));
        player.money = 15;
        assert!(can_afford(&player, &flowers()));
    }
}
