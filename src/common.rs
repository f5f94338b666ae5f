use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Vanilla statistics exposed through the API, named as the host names them.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statistic {
    /// Despite the name, counted in ticks.
    PlayOneMinute,
    Deaths,
    PlayerKills,
    MobKills,
    WalkOneCm,
    Jump,
    DamageDealt,
    DamageTaken,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::PlayOneMinute,
        Statistic::Deaths,
        Statistic::PlayerKills,
        Statistic::MobKills,
        Statistic::WalkOneCm,
        Statistic::Jump,
        Statistic::DamageDealt,
        Statistic::DamageTaken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::PlayOneMinute => "PLAY_ONE_MINUTE",
            Statistic::Deaths => "DEATHS",
            Statistic::PlayerKills => "PLAYER_KILLS",
            Statistic::MobKills => "MOB_KILLS",
            Statistic::WalkOneCm => "WALK_ONE_CM",
            Statistic::Jump => "JUMP",
            Statistic::DamageDealt => "DAMAGE_DEALT",
            Statistic::DamageTaken => "DAMAGE_TAKEN",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters read from a connected player. A statistic the host failed to
/// report is absent from `counters`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveStats {
    pub counters:   BTreeMap<Statistic, u64>,
    pub level:      Option<u32>,
    pub world:      Option<String>,
}

impl LiveStats {
    pub fn get(&self, stat: Statistic) -> Option<u64> {
        self.counters.get(&stat).copied()
    }
}

/// A player as seen by the host at the moment of the request.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRecord {
    pub name:           String,
    pub uuid:           Uuid,
    pub online:         bool,
    /// Epoch millis, zero or negative when unknown
    pub first_played:   i64,
    pub last_played:    i64,
    /// `None` when the player is known but counters could not be read at all
    pub live:           Option<LiveStats>,
    pub note:           Option<String>,
}

impl PlayerRecord {
    pub fn is_partial(&self) -> bool {
        self.note.is_some()
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerSnapshot {
    pub online_players: usize,
    pub max_players:    usize,
    pub server_name:    String,
    pub version:        String,
}
