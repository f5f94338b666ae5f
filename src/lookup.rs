use crate::common::{LiveStats, PlayerRecord, Statistic};
use crate::host::{guard, guard_result, OnlinePlayer, PlayerRegistry};
use std::sync::Arc;
use tracing::{error, warn};

pub const OFFLINE_NOTE: &str = "Player is offline - some stats may be unavailable";
pub const DEGRADED_NOTE: &str = "Some statistics could not be read and were omitted";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LookupError {
    #[error("player '{0}' has never joined this server")]
    NotFound(String),

    /// The registry failed while resolving the name
    #[error("host failed to resolve '{name}': {reason}")]
    Host { name: String, reason: String },
}

/// Reads player records from the host registry. Holds no state of its own,
/// every call goes to the host.
#[derive(Clone)]
pub struct StatsLookup {
    players: Arc<dyn PlayerRegistry>,
}

impl StatsLookup {
    pub fn new(players: Arc<dyn PlayerRegistry>) -> Self {
        Self { players }
    }

    pub fn lookup(&self, name: &str) -> Result<PlayerRecord, LookupError> {
        let resolved = guard(|| self.players.offline_player(name)).map_err(|e| {
            error!(player = name, "Failed to resolve player: {}", e);
            LookupError::Host { name: name.to_string(), reason: e.to_string() }
        })?;

        let player = match resolved {
            Some(p) if p.has_played_before || p.online => p,
            _ => return Err(LookupError::NotFound(name.to_string())),
        };

        let mut record = PlayerRecord {
            name: player.name,
            uuid: player.uuid,
            online: player.online,
            first_played: player.first_played,
            last_played: player.last_played,
            live: None,
            note: None,
        };

        let handle = if player.online {
            guard(|| self.players.online_player(&player.uuid))
        } else {
            Ok(None)
        };

        match handle {
            Ok(Some(handle)) => {
                let (live, complete) = read_live(&record.name, handle.as_ref());
                record.live = Some(live);
                if !complete {
                    record.note = Some(DEGRADED_NOTE.to_string());
                }
            }
            Ok(None) => record.note = Some(OFFLINE_NOTE.to_string()),
            Err(e) => {
                warn!(player = %record.name, "Failed to get live player: {}", e);
                record.note = Some(DEGRADED_NOTE.to_string());
            }
        }

        Ok(record)
    }
}

/// Read every counter, skipping the ones the host fails to report or
/// panics on.
fn read_live(name: &str, player: &dyn OnlinePlayer) -> (LiveStats, bool) {
    let mut live = LiveStats::default();
    let mut complete = true;

    for stat in Statistic::ALL {
        match guard_result(|| player.statistic(stat)) {
            Ok(value) => {
                live.counters.insert(stat, value);
            }
            Err(e) => {
                warn!(player = name, statistic = %stat, "Failed to get statistic: {}", e);
                complete = false;
            }
        }
    }

    match guard_result(|| player.level()) {
        Ok(level) => live.level = Some(level),
        Err(e) => {
            warn!(player = name, "Failed to get level: {}", e);
            complete = false;
        }
    }

    match guard_result(|| player.world()) {
        Ok(world) => live.world = Some(world),
        Err(e) => {
            warn!(player = name, "Failed to get world: {}", e);
            complete = false;
        }
    }

    (live, complete)
}
