//! Mailbox messages produced by mission effects.

use serde::{Deserialize, Serialize};

use super::{
    Boost, BuildingType, Coordinates, Defenses, Fleet, Levels, Loot, MessageId, PlayerId,
    ResearchType, Resources, Timestamp,
};
use crate::mission::{ExpeditionOutcome, ExplorationOutcome};

/// Outcome of one battle, addressed to one of the combatants.
///
/// Both combatants receive the same report; only `is_player_attacker`
/// differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    /// Shared by the attacker's and the defender's copy.
    pub id: u64,
    /// Where the battle took place.
    pub target_coords: Coordinates,
    /// Attacking player's name.
    pub attacker_name: String,
    /// Defending player's name.
    pub defender_name: String,
    /// Whether the recipient was the attacker.
    pub is_player_attacker: bool,
    /// Attacking fleet before the battle.
    pub attacker_fleet: Fleet,
    /// Defending fleet before the battle.
    pub defender_fleet: Fleet,
    /// Defenses before the battle.
    pub defender_defenses: Defenses,
    /// Attacker ships destroyed.
    pub attacker_losses: Fleet,
    /// Defender ships destroyed.
    pub defender_losses: Fleet,
    /// Defenses destroyed.
    pub defender_defenses_losses: Defenses,
    /// Resources carried off by the attacker.
    pub loot: Loot,
    /// Metal and crystal added to the debris field.
    pub debris_created: Resources,
}

/// Intelligence gathered by a spy mission.
///
/// Sections the probes could not disclose are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpyReport {
    /// Planet spied on.
    pub target_coords: Coordinates,
    /// Whether the probes were intercepted before sending any data.
    pub failed: bool,
    /// Probes shot down.
    pub probes_lost: u64,
    /// Stockpile.
    pub resources: Option<Resources>,
    /// Stationed fleet (tech parity).
    pub fleet: Option<Fleet>,
    /// Defenses (+2 spy tech).
    pub defenses: Option<Defenses>,
    /// Buildings (+4 spy tech).
    pub buildings: Option<Levels<BuildingType>>,
    /// Research (+6 spy tech).
    pub research: Option<Levels<ResearchType>>,
}

/// Report of an expedition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpeditionDetails {
    /// Fleet that set out.
    pub fleet_sent: Fleet,
    /// Resources found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_gained: Option<Resources>,
    /// Credits found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_gained: Option<f64>,
    /// Ships that joined the fleet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_gained: Option<Fleet>,
    /// Ships lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_lost: Option<Fleet>,
    /// Extra time spent before turning back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u64>,
}

/// Report of an exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationDetails {
    /// Area explored.
    pub target_coords: Coordinates,
    /// Boost found, delivered when the fleet returns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_boost: Option<Boost>,
    /// Resources found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_gained: Option<Resources>,
    /// Ships lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_lost: Option<Fleet>,
    /// Ships recovered from wrecks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_gained: Option<Fleet>,
}

/// Battle message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleMessageBody {
    /// The battle report.
    pub report: BattleReport,
}

/// Spy message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyMessage {
    /// The spy report.
    pub report: SpyReport,
}

/// Sent to a defender whose planet was probed and who detected the probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspionageEventMessage {
    /// Planet the probes came from.
    pub spy_coords: Coordinates,
    /// Name of the spying player.
    pub spy_name: String,
}

/// Expedition message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpeditionMessage {
    /// Outcome rolled.
    pub outcome: ExpeditionOutcome,
    /// What happened.
    pub details: ExpeditionDetails,
}

/// Exploration message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationMessage {
    /// Outcome rolled.
    pub outcome: ExplorationOutcome,
    /// What happened.
    pub details: ExplorationDetails,
}

/// Colonization message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonizationMessage {
    /// Slot targeted.
    pub coords: Coordinates,
    /// Whether a colony was founded.
    pub success: bool,
}

/// Typed message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    /// Battle report.
    Battle(BattleMessageBody),
    /// Spy report.
    Spy(SpyMessage),
    /// Detected espionage against the recipient.
    EspionageEvent(EspionageEventMessage),
    /// Expedition report.
    Expedition(ExpeditionMessage),
    /// Exploration report.
    Exploration(ExplorationMessage),
    /// Colonization result.
    Colonization(ColonizationMessage),
}

/// A message in a player's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message id.
    pub id: MessageId,
    /// Recipient.
    pub recipient_id: PlayerId,
    /// Time of the event described.
    pub timestamp: Timestamp,
    /// Whether the recipient has opened it.
    pub is_read: bool,
    /// Subject line.
    pub subject: String,
    /// Payload, tagged by `type`.
    pub body: MessageBody,
}
