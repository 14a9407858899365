//! The command surface.
//!
//! A `Command` is everything a client can ask the engine to do. Commands
//! are transport-agnostic values: the session routes them to handlers and
//! answers with a snapshot or a `CommandError`.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::cards::CardId;

/// Where the absorbed half of a merge comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MergeSource {
    /// A unit card in hand, paid for with its gold cost.
    Hand { index: usize },
    /// Another unit on the player's field, free.
    Field { unit_id: EntityId },
}

/// A client command.
///
/// ```
/// use card_gauntlet::core::{Command, EntityId};
///
/// let attack = Command::Attack { attacker_id: EntityId(4), target_id: EntityId(17) };
/// assert_eq!(attack.name(), "attack");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    StartGame { deck: Vec<CardId> },
    PlayCard { hand_index: usize, target_id: Option<EntityId> },
    Attack { attacker_id: EntityId, target_id: EntityId },
    ActivateAbility {
        unit_id: EntityId,
        ability_index: usize,
        target_id: Option<EntityId>,
    },
    MergeUnits { source: MergeSource, target_id: EntityId },
    EndTurn,
    ConfirmRound,
    BuyCard { offer_index: usize },
    ContinueRound,
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartGame { .. } => "start_game",
            Command::PlayCard { .. } => "play_card",
            Command::Attack { .. } => "attack",
            Command::ActivateAbility { .. } => "activate_ability",
            Command::MergeUnits { .. } => "merge_units",
            Command::EndTurn => "end_turn",
            Command::ConfirmRound => "confirm_round",
            Command::BuyCard { .. } => "buy_card",
            Command::ContinueRound => "continue_round",
        }
    }
}

/// An accepted command with the clock it was applied at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub round: u32,
    pub turn: u32,
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let cmd = Command::PlayCard {
            hand_index: 2,
            target_id: Some(EntityId(11)),
        };
        let json = serde_json::to_string(&cmd).unwrap();

        assert_eq!(json, r#"{"type":"playCard","handIndex":2,"targetId":11}"#);
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), cmd);
    }

    #[test]
    fn test_merge_source_wire_shape() {
        let cmd = Command::MergeUnits {
            source: MergeSource::Field { unit_id: EntityId(5) },
            target_id: EntityId(6),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(back, cmd);
        assert!(json.contains(r#""from":"field""#));
    }

    #[test]
    fn test_unit_variants() {
        let back: Command = serde_json::from_str(r#"{"type":"endTurn"}"#).unwrap();
        assert_eq!(back, Command::EndTurn);
        assert_eq!(Command::ContinueRound.name(), "continue_round");
    }
}
