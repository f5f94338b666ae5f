//! A host backed by a fixed snapshot of players, for running the API
//! outside a game server and for tests.

use crate::common::Statistic;
use crate::host::{HostError, OfflinePlayer, OnlinePlayer, PlayerRegistry, PluginRegistry, ServerInfo};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read host snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed host snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPlayer {
    pub name:               String,
    pub uuid:               Uuid,
    #[serde(default = "default_true")]
    pub has_played_before:  bool,
    #[serde(default)]
    pub online:             bool,
    #[serde(default)]
    pub first_played:       i64,
    #[serde(default)]
    pub last_played:        i64,
    #[serde(default)]
    pub level:              u32,
    #[serde(default = "default_world")]
    pub world:              String,
    /// Statistics missing here fail to read, like an untracked counter on a real host
    #[serde(default)]
    pub statistics:         BTreeMap<Statistic, u64>,
}

fn default_true() -> bool {
    true
}

fn default_world() -> String {
    "world".to_string()
}

impl MemoryPlayer {
    pub fn new(name: &str, uuid: Uuid) -> Self {
        Self {
            name: name.to_string(),
            uuid,
            has_played_before: true,
            online: false,
            first_played: 0,
            last_played: 0,
            level: 0,
            world: default_world(),
            statistics: BTreeMap::new(),
        }
    }

    pub fn online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn played(mut self, first: i64, last: i64) -> Self {
        self.first_played = first;
        self.last_played = last;
        self
    }

    pub fn stat(mut self, stat: Statistic, value: u64) -> Self {
        self.statistics.insert(stat, value);
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn world(mut self, world: &str) -> Self {
        self.world = world.to_string();
        self
    }
}

impl OnlinePlayer for MemoryPlayer {
    fn statistic(&self, stat: Statistic) -> Result<u64, HostError> {
        self.statistics.get(&stat).copied().ok_or(HostError::Untracked(stat))
    }

    fn level(&self) -> Result<u32, HostError> {
        Ok(self.level)
    }

    fn world(&self) -> Result<String, HostError> {
        Ok(self.world.clone())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    server_name:    String,
    version:        String,
    #[serde(default = "default_max_players")]
    max_players:    usize,
    #[serde(default)]
    plugins:        BTreeSet<String>,
    #[serde(default)]
    players:        Vec<MemoryPlayer>,
}

fn default_max_players() -> usize {
    20
}

pub struct MemoryHost {
    server_name:    String,
    version:        String,
    max_players:    usize,
    plugins:        BTreeSet<String>,
    players:        Vec<Arc<MemoryPlayer>>,
}

impl MemoryHost {
    pub fn new(server_name: &str, version: &str, max_players: usize) -> Self {
        Self {
            server_name: server_name.to_string(),
            version: version.to_string(),
            max_players,
            plugins: BTreeSet::new(),
            players: Vec::new(),
        }
    }

    pub fn with_plugin(mut self, name: &str) -> Self {
        self.plugins.insert(name.to_string());
        self
    }

    pub fn with_player(mut self, player: MemoryPlayer) -> Self {
        self.players.push(Arc::new(player));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self {
            server_name: snapshot.server_name,
            version: snapshot.version,
            max_players: snapshot.max_players,
            plugins: snapshot.plugins,
            players: snapshot.players.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    fn find(&self, name: &str) -> Option<&Arc<MemoryPlayer>> {
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl PlayerRegistry for MemoryHost {
    fn offline_player(&self, name: &str) -> Option<OfflinePlayer> {
        self.find(name).map(|p| OfflinePlayer {
            name: p.name.clone(),
            uuid: p.uuid,
            has_played_before: p.has_played_before,
            online: p.online,
            first_played: p.first_played,
            last_played: p.last_played,
        })
    }

    fn online_player(&self, uuid: &Uuid) -> Option<Arc<dyn OnlinePlayer>> {
        self.players
            .iter()
            .find(|p| p.online && &p.uuid == uuid)
            .map(|p| p.clone() as Arc<dyn OnlinePlayer>)
    }
}

impl ServerInfo for MemoryHost {
    fn online_players(&self) -> usize {
        self.players.iter().filter(|p| p.online).count()
    }

    fn max_players(&self) -> usize {
        self.max_players
    }

    fn server_name(&self) -> String {
        self.server_name.clone()
    }

    fn version(&self) -> String {
        self.version.clone()
    }
}

impl PluginRegistry for MemoryHost {
    fn is_plugin_enabled(&self, name: &str) -> bool {
        self.plugins.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "serverName": "Lowkeycraft",
        "version": "1.20.4-R0.1",
        "maxPlayers": 50,
        "plugins": ["PlayerStats"],
        "players": [
            {
                "name": "Notch",
                "uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5",
                "online": true,
                "firstPlayed": 1700000000000,
                "lastPlayed": 1700003600000,
                "level": 12,
                "world": "world_nether",
                "statistics": { "DEATHS": 4, "JUMP": 120 }
            },
            {
                "name": "jeb_",
                "uuid": "853c80ef-3c37-49fd-aa49-938b674adae6"
            }
        ]
    }"#;

    #[test]
    fn loads_snapshot() {
        let host = MemoryHost::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(host.max_players(), 50);
        assert_eq!(host.online_players(), 1);
        assert!(host.is_plugin_enabled("PlayerStats"));
        assert!(!host.is_plugin_enabled("Essentials"));

        let jeb = host.offline_player("jeb_").unwrap();
        assert!(jeb.has_played_before);
        assert!(!jeb.online);
        assert_eq!(jeb.first_played, 0);
    }

    #[test]
    fn resolves_names_case_insensitively() {
        let host = MemoryHost::from_json_str(SNAPSHOT).unwrap();
        let notch = host.offline_player("nOtCh").unwrap();
        assert_eq!(notch.name, "Notch");
        assert!(host.offline_player("Herobrine").is_none());
    }

    #[test]
    fn only_connected_players_have_live_handles() {
        let host = MemoryHost::from_json_str(SNAPSHOT).unwrap();
        let notch = host.offline_player("Notch").unwrap();
        let jeb = host.offline_player("jeb_").unwrap();

        let live = host.online_player(&notch.uuid).unwrap();
        assert_eq!(live.statistic(Statistic::Deaths).unwrap(), 4);
        assert!(matches!(live.statistic(Statistic::MobKills), Err(HostError::Untracked(Statistic::MobKills))));
        assert_eq!(live.world().unwrap(), "world_nether");

        assert!(host.online_player(&jeb.uuid).is_none());
    }

    #[test]
    fn rejects_malformed_snapshot() {
        assert!(matches!(MemoryHost::from_json_str("{\"players\": 3}"), Err(SnapshotError::Parse(_))));
    }
}
