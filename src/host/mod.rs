//! Seams to the game server this API is embedded in.
//!
//! The host owns every player record and statistic counter. Nothing here
//! writes to it; implementations are expected to be safe to read from any
//! worker thread.

pub mod memory;

use crate::common::{ServerSnapshot, Statistic};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

/// Name of the statistics plugin that must be enabled on the host.
pub const STATS_PROVIDER: &str = "PlayerStats";

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("statistic {0} is not tracked for this player")]
    Untracked(Statistic),

    #[error("host unavailable: {0}")]
    Unavailable(String),

    #[error("host panicked: {0}")]
    Panicked(String),
}

/// Run a call into the host, turning a panic into [`HostError::Panicked`].
pub fn guard<T, F>(call: F) -> Result<T, HostError>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(call)).map_err(|payload| HostError::Panicked(panic_message(payload.as_ref())))
}

/// Like [`guard`], for calls that already report their own errors.
pub fn guard_result<T, F>(call: F) -> Result<T, HostError>
where
    F: FnOnce() -> Result<T, HostError>,
{
    guard(call).and_then(|r| r)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Entry in the host's historical player registry.
#[derive(Clone, Debug, PartialEq)]
pub struct OfflinePlayer {
    pub name:               String,
    pub uuid:               Uuid,
    pub has_played_before:  bool,
    pub online:             bool,
    pub first_played:       i64,
    pub last_played:        i64,
}

pub trait PlayerRegistry: Send + Sync {
    /// Resolve a player by name, whether or not they are connected.
    fn offline_player(&self, name: &str) -> Option<OfflinePlayer>;

    /// The live handle of a connected player.
    fn online_player(&self, uuid: &Uuid) -> Option<Arc<dyn OnlinePlayer>>;
}

pub trait OnlinePlayer: Send + Sync {
    fn statistic(&self, stat: Statistic) -> Result<u64, HostError>;
    fn level(&self) -> Result<u32, HostError>;
    fn world(&self) -> Result<String, HostError>;
}

pub trait ServerInfo: Send + Sync {
    fn online_players(&self) -> usize;
    fn max_players(&self) -> usize;
    fn server_name(&self) -> String;
    fn version(&self) -> String;

    fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            online_players: self.online_players(),
            max_players:    self.max_players(),
            server_name:    self.server_name(),
            version:        self.version(),
        }
    }
}

pub trait PluginRegistry: Send + Sync {
    fn is_plugin_enabled(&self, name: &str) -> bool;
}

/// Everything the API needs from the host, shareable across workers.
#[derive(Clone)]
pub struct HostServices {
    pub players:    Arc<dyn PlayerRegistry>,
    pub server:     Arc<dyn ServerInfo>,
    pub plugins:    Arc<dyn PluginRegistry>,
}

impl HostServices {
    /// Use a single object for all three seams.
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: PlayerRegistry + ServerInfo + PluginRegistry + 'static,
    {
        Self {
            players: host.clone(),
            server: host.clone(),
            plugins: host,
        }
    }
}
