use crate::appdata::{AppData, Env, EnvError, API_NAME, PLUGIN_VERSION};
use crate::command::StatsApiCommand;
use crate::host::{HostServices, STATS_PROVIDER};
use crate::server::{self, RunningServer, ServerConfig, ServerError};
use actix_web::web;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Stopped => "Stopped",
            LifecycleState::Starting => "Starting",
            LifecycleState::Running => "Running",
            LifecycleState::Stopping => "Stopping",
        };
        f.write_str(s)
    }
}

/// Lifecycle state readable from the command thread.
#[derive(Clone, Default)]
pub struct SharedState(Arc<RwLock<LifecycleState>>);

impl SharedState {
    pub fn get(&self) -> LifecycleState {
        match self.0.read() {
            Ok(s) => *s,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, state: LifecycleState) {
        match self.0.write() {
            Ok(mut s) => *s = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("{0} plugin not found! Please install {0} to use this plugin.")]
    MissingDependency(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] EnvError),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to start HTTP server: {0}")]
    Server(#[from] ServerError),
}

/// An enabled plugin: the listener is bound and the command is registered.
/// Dropping out of `enable` with an error leaves nothing running.
pub struct StatsPlugin {
    server:     RunningServer,
    command:    StatsApiCommand,
    state:      SharedState,
}

impl StatsPlugin {
    pub fn enable(host: HostServices, env: Env) -> Result<Self, PluginError> {
        Self::enable_with_state(host, env, SharedState::default())
    }

    /// Enable, publishing lifecycle transitions into `state` as they happen.
    pub fn enable_with_state(host: HostServices, env: Env, state: SharedState) -> Result<Self, PluginError> {
        info!("LowkeycraftStats plugin is starting...");
        state.set(LifecycleState::Starting);

        if !host.plugins.is_plugin_enabled(STATS_PROVIDER) {
            state.set(LifecycleState::Stopped);
            let err = PluginError::MissingDependency(STATS_PROVIDER);
            error!("{}", err);
            return Err(err);
        }

        let data = match AppData::new(&host) {
            Ok(d) => web::Data::new(d),
            Err(e) => {
                state.set(LifecycleState::Stopped);
                error!("Failed to register metrics: {}", e);
                return Err(e.into());
            }
        };

        let server = match server::start(&ServerConfig::from(&env), data) {
            Ok(s) => s,
            Err(e) => {
                state.set(LifecycleState::Stopped);
                error!("Failed to start HTTP server! {}", e);
                return Err(e.into());
            }
        };

        let port = server.port().unwrap_or(env.port);
        state.set(LifecycleState::Running);

        let command = StatsApiCommand::new(port, PLUGIN_VERSION, state.clone());

        info!("{} enabled, API server running on port {}", API_NAME, port);
        Ok(Self { server, command, state })
    }

    pub fn command(&self) -> &StatsApiCommand {
        &self.command
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn port(&self) -> Option<u16> {
        self.server.port()
    }

    pub fn disable(self) -> Result<(), PluginError> {
        info!("LowkeycraftStats plugin is shutting down...");
        self.state.set(LifecycleState::Stopping);

        let result = self.server.stop();
        self.state.set(LifecycleState::Stopped);
        result?;

        info!("LowkeycraftStats plugin disabled successfully!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_state_is_shared() {
        let a = SharedState::default();
        let b = a.clone();
        assert_eq!(b.get(), LifecycleState::Stopped);
        a.set(LifecycleState::Running);
        assert_eq!(b.get(), LifecycleState::Running);
    }
}
