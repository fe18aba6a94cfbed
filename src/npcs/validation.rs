//! Load-time dialogue graph validation.
//!
//! Empty and dangling `next_node_id` links are counted and logged; loading
//! always continues. The END sentinel is exempt, any case.

use crate::shared::*;

use super::dialogue::is_terminal;

/// One validation pass over a single NPC's dialogue graph.
pub fn validate_dialogues(npc: &NpcRecord) -> Vec<String> {
    let mut findings = Vec::new();
    for node in npc.dialogues.values() {
        for choice in &node.choices {
            let link = choice.next_node_id.trim();
            if link.is_empty() {
                findings.push(format!(
                    "{}: node '{}' choice '{}' has an empty next_node_id",
                    npc.id, node.id, choice.text
                ));
            } else if !is_terminal(link) && !npc.dialogues.contains_key(link) {
                findings.push(format!(
                    "{}: node '{}' choice '{}' links to missing node '{}'",
                    npc.id, node.id, choice.text, link
                ));
            }
        }
    }
    findings
}

/// Validates every NPC in the registry; the caller stores the result in the
/// [`DataIntegrityReport`].
pub fn validate_registry(registry: &NpcRegistry) -> Vec<String> {
    registry
        .npcs
        .iter()
        .flat_map(validate_dialogues)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn npc_with_nodes(nodes: Vec<DialogueNode>) -> NpcRecord {
        let mut dialogues = HashMap::new();
        for node in nodes {
            dialogues.insert(node.id.clone(), node);
        }
        NpcRecord {
            id: "marco".to_string(),
            name: "Marco".to_string(),
            color_tag: None,
            sprite_path: None,
            description: None,
            age: None,
            stats: NpcStats {
                base_patience: 40,
                current_patience: 40,
                max_affection: 100,
                current_affection: 0,
                jealousy_factor: 0.0,
            },
            schedule: HashMap::new(),
            special_events: HashMap::new(),
            dialogues,
        }
    }

    fn choice(text: &str, next: &str) -> DialogueChoice {
        DialogueChoice {
            text: text.to_string(),
            next_node_id: next.to_string(),
            impact: None,
            requirements: None,
        }
    }

    #[test]
    fn healthy_graph_has_no_findings() {
        let npc = npc_with_nodes(vec![
            DialogueNode {
                id: "root".to_string(),
                text: "Ehi!".to_string(),
                choices: vec![choice("Continua", "saluto"), choice("Basta", "END")],
            },
            DialogueNode {
                id: "saluto".to_string(),
                text: "Come va?".to_string(),
                choices: vec![choice("Bene", "end")],
            },
        ]);
        assert!(validate_dialogues(&npc).is_empty());
    }

    #[test]
    fn dangling_link_is_flagged_exactly_once() {
        let npc = npc_with_nodes(vec![DialogueNode {
            id: "root".to_string(),
            text: "Ciao".to_string(),
            choices: vec![choice("Vai", "nodo_inesistente"), choice("Esci", "END")],
        }]);
        let findings = validate_dialogues(&npc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("nodo_inesistente"));
    }

    #[test]
    fn empty_link_is_flagged() {
        let npc = npc_with_nodes(vec![DialogueNode {
            id: "root".to_string(),
            text: "Ciao".to_string(),
            choices: vec![choice("Muto", "  ")],
        }]);
        let findings = validate_dialogues(&npc);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("empty next_node_id"));
    }
}
