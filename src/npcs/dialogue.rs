//! Dialogue engine: graph traversal, requirement gating, stat impacts.

use bevy::prelude::*;

use crate::shared::*;

/// Where a followed choice link leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Conversation over (empty link or the END sentinel, any case).
    Ended,
    /// Move to this node.
    Moved(String),
    /// Link points at a node the graph does not contain.
    BrokenLink(String),
}

/// True when the link terminates the conversation.
pub fn is_terminal(next_node_id: &str) -> bool {
    next_node_id.is_empty() || next_node_id.eq_ignore_ascii_case(END_NODE_ID)
}

/// Follows a choice link within an NPC's graph. Node ids are case-sensitive;
/// only the END sentinel is matched case-insensitively.
pub fn follow_link(npc: &NpcRecord, next_node_id: &str) -> ChoiceOutcome {
    if is_terminal(next_node_id) {
        ChoiceOutcome::Ended
    } else if npc.dialogues.contains_key(next_node_id) {
        ChoiceOutcome::Moved(next_node_id.to_string())
    } else {
        ChoiceOutcome::BrokenLink(next_node_id.to_string())
    }
}

/// Evaluates a choice's requirements against the player. Every present field
/// must hold; a choice with no requirements is always selectable. Used both
/// to gate selection and to compute per-choice enabled flags for display.
pub fn can_select(requirements: Option<&DialogueRequirements>, player: &PlayerState) -> bool {
    let Some(reqs) = requirements else {
        return true;
    };
    if reqs.money.is_some_and(|min| player.money < min) {
        return false;
    }
    if reqs
        .intelligence
        .is_some_and(|min| player.intelligence < min)
    {
        return false;
    }
    if reqs.energy.is_some_and(|min| player.energy() < min) {
        return false;
    }
    // An empty item id means no requirement, the same as an absent field.
    if reqs
        .item_id
        .as_deref()
        .filter(|item| !item.is_empty())
        .is_some_and(|item| !player.has_item(item))
    {
        return false;
    }
    if let Some(conditions) = &reqs.story_flags_condition {
        for (flag, expected) in conditions {
            if player.check_flag(flag) != *expected {
                return false;
            }
        }
    }
    true
}

/// Applies a choice's impact: affection clamped to `[0, max_affection]`,
/// patience to `[0, 100]`, story flags upserted.
pub fn apply_impact(impact: &DialogueImpact, stats: &mut NpcStats, player: &mut PlayerState) {
    stats.current_affection =
        (stats.current_affection + impact.affection).clamp(0, stats.max_affection);
    stats.current_patience = (stats.current_patience + impact.patience).clamp(0, 100);
    if let Some(flags) = &impact.set_story_flags {
        for (flag, value) in flags {
            player.set_flag(flag.clone(), *value);
        }
    }
}

/// The current node's choices paired with their enabled flag, for display.
/// Empty when no conversation is active.
pub fn visible_choices<'a>(
    dialogue: &ActiveDialogue,
    registry: &'a NpcRegistry,
    player: &PlayerState,
) -> Vec<(usize, &'a DialogueChoice, bool)> {
    let ActiveDialogue::AtNode { npc_id, node_id } = dialogue else {
        return Vec::new();
    };
    let Some(node) = registry
        .get(npc_id)
        .and_then(|npc| npc.dialogues.get(node_id))
    else {
        return Vec::new();
    };
    node.choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| (idx, choice, can_select(choice.requirements.as_ref(), player)))
        .collect()
}

/// System: open a conversation at the root node.
pub fn handle_dialogue_start(
    mut start_events: EventReader<DialogueStartEvent>,
    registry: Res<NpcRegistry>,
    mut dialogue: ResMut<ActiveDialogue>,
    mut next_state: ResMut<NextState<GameState>>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for ev in start_events.read() {
        if dialogue.is_active() {
            warn!(
                "[Dialogue] Ignoring start for '{}': a conversation is already active",
                ev.npc_id
            );
            continue;
        }
        let Some(npc) = registry.get(&ev.npc_id) else {
            warn!("[Dialogue] Unknown NPC '{}'", ev.npc_id);
            continue;
        };
        if !npc.has_dialogue() {
            status_writer.send(StatusEvent::new(format!(
                "{} has nothing to say right now.",
                npc.name
            )));
            continue;
        }
        *dialogue = ActiveDialogue::AtNode {
            npc_id: ev.npc_id.clone(),
            node_id: ROOT_NODE_ID.to_string(),
        };
        next_state.set(GameState::Dialogue);
        info!("[Dialogue] Started with '{}'", ev.npc_id);
    }
}

/// System: resolve a choice selection against the current node.
///
/// An unmet requirement or out-of-range index leaves the conversation where
/// it is. A dangling link ends the conversation and reports it instead of
/// crashing.
pub fn handle_dialogue_choice(
    mut choice_events: EventReader<DialogueChoiceEvent>,
    mut dialogue: ResMut<ActiveDialogue>,
    mut registry: ResMut<NpcRegistry>,
    mut player: ResMut<PlayerState>,
    mut next_state: ResMut<NextState<GameState>>,
    mut ended_writer: EventWriter<DialogueEndedEvent>,
    mut integrity_writer: EventWriter<DialogueIntegrityEvent>,
) {
    for ev in choice_events.read() {
        let ActiveDialogue::AtNode { npc_id, node_id } = dialogue.clone() else {
            continue;
        };
        let Some(npc) = registry.get_mut(&npc_id) else {
            *dialogue = ActiveDialogue::Inactive;
            continue;
        };
        let Some(choice) = npc
            .dialogues
            .get(&node_id)
            .and_then(|node| node.choices.get(ev.choice_index))
            .cloned()
        else {
            warn!(
                "[Dialogue] Choice index {} out of range at node '{}'",
                ev.choice_index, node_id
            );
            continue;
        };

        if !can_select(choice.requirements.as_ref(), &player) {
            info!(
                "[Dialogue] Choice '{}' not selectable at node '{}'",
                choice.text, node_id
            );
            continue;
        }

        if let Some(impact) = &choice.impact {
            apply_impact(impact, &mut npc.stats, &mut player);
        }

        match follow_link(npc, &choice.next_node_id) {
            ChoiceOutcome::Moved(next) => {
                *dialogue = ActiveDialogue::AtNode {
                    npc_id,
                    node_id: next,
                };
            }
            ChoiceOutcome::Ended => {
                end_conversation(&npc_id, &mut dialogue, &mut next_state, &mut ended_writer);
            }
            ChoiceOutcome::BrokenLink(target) => {
                warn!(
                    "[Dialogue] '{}' node '{}' links to missing node '{}'",
                    npc_id, node_id, target
                );
                integrity_writer.send(DialogueIntegrityEvent {
                    npc_id: npc_id.clone(),
                    node_id,
                    next_node_id: target,
                });
                end_conversation(&npc_id, &mut dialogue, &mut next_state, &mut ended_writer);
            }
        }
    }
}

fn end_conversation(
    npc_id: &str,
    dialogue: &mut ActiveDialogue,
    next_state: &mut NextState<GameState>,
    ended_writer: &mut EventWriter<DialogueEndedEvent>,
) {
    *dialogue = ActiveDialogue::Inactive;
    next_state.set(GameState::LocationInside);
    ended_writer.send(DialogueEndedEvent {
        npc_id: npc_id.to_string(),
    });
    info!("[Dialogue] Ended with '{}'", npc_id);
}
