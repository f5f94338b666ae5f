use crate::format::StatsFormatter;
use crate::host::{HostServices, ServerInfo};
use crate::lookup::StatsLookup;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const API_NAME: &str = "Lowkeycraft Stats API";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared by every worker. Cloning is cheap, all members are handles.
#[derive(Clone)]
pub struct AppData {
    pub lookup:     StatsLookup,
    pub formatter:  StatsFormatter,
    pub server:     Arc<dyn ServerInfo>,
    pub prom:       Prom,
    pub version:    String,
}

impl AppData {
    pub fn new(host: &HostServices) -> Result<Self, prometheus::Error> {
        Ok(Self {
            lookup: StatsLookup::new(host.players.clone()),
            formatter: StatsFormatter::new(),
            server: host.server.clone(),
            prom: Prom::new()?,
            version: PLUGIN_VERSION.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EnvError {
    #[error("environmental variable '{key}' has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Listener configuration, read once when the plugin is enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct Env {
    pub host:               String,
    pub port:               u16,
    pub workers:            usize,
    pub keep_alive:         Duration,
    pub shutdown_timeout:   Duration,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 8,
            keep_alive: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl Env {
    pub fn new() -> Result<Self, EnvError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_vars<F>(var: F) -> Result<Self, EnvError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = var("STATS_API_HOST").unwrap_or(defaults.host);
        let port = parse(&var, "STATS_API_PORT", defaults.port)?;
        let workers = parse(&var, "STATS_API_WORKERS", defaults.workers)?;
        if workers == 0 {
            return Err(EnvError::Invalid { key: "STATS_API_WORKERS", value: "0".to_string() });
        }

        let keep_alive = parse(&var, "STATS_API_KEEP_ALIVE_SECS", defaults.keep_alive.as_secs())?;
        let shutdown_timeout = parse(&var, "STATS_API_SHUTDOWN_TIMEOUT_SECS", defaults.shutdown_timeout.as_secs())?;

        Ok(Self {
            host,
            port,
            workers,
            keep_alive: Duration::from_secs(keep_alive),
            shutdown_timeout: Duration::from_secs(shutdown_timeout),
        })
    }
}

fn parse<F, T>(var: &F, key: &'static str, default: T) -> Result<T, EnvError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|_| EnvError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct Prom {
    pub registry:           Registry,
    pub requests:           IntCounterVec,
    pub player_not_found:   IntCounter,
    pub partial_reads:      IntCounter,
}

impl Prom {
    pub fn new() -> Result<Self, prometheus::Error> {
        let opts = Opts::new("statsapi_requests_total", "Requests served, by endpoint");
        let requests = IntCounterVec::new(opts, &["endpoint"])?;

        let player_not_found = IntCounter::new("statsapi_player_not_found_total", "Player lookups for names the server has never seen")?;
        let partial_reads = IntCounter::new("statsapi_partial_reads_total", "Player documents served with some statistics missing")?;

        let registry = Registry::new();
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(player_not_found.clone()))?;
        registry.register(Box::new(partial_reads.clone()))?;

        Ok(Self {
            registry,
            requests,
            player_not_found,
            partial_reads,
        })
    }

    pub fn hit(&self, endpoint: &str) {
        self.requests.with_label_values(&[endpoint]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> Result<Env, EnvError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Env::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(env(&[]).unwrap(), Env::default());
    }

    #[test]
    fn reads_overrides() {
        let env = env(&[("STATS_API_PORT", "9090"), ("STATS_API_WORKERS", " 2 "), ("STATS_API_HOST", "127.0.0.1")]).unwrap();
        assert_eq!(env.port, 9090);
        assert_eq!(env.workers, 2);
        assert_eq!(env.host, "127.0.0.1");
        assert_eq!(env.keep_alive, Duration::from_secs(30));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            env(&[("STATS_API_PORT", "eighty")]),
            Err(EnvError::Invalid { key: "STATS_API_PORT", value: "eighty".to_string() })
        );
        assert!(env(&[("STATS_API_WORKERS", "0")]).is_err());
        assert!(env(&[("STATS_API_PORT", "70000")]).is_err());
    }

    #[test]
    fn counts_requests_per_endpoint() {
        let prom = Prom::new().unwrap();
        prom.hit("health");
        prom.hit("health");
        prom.hit("player");
        assert_eq!(prom.requests.with_label_values(&["health"]).get(), 2);
        assert_eq!(prom.requests.with_label_values(&["player"]).get(), 1);
    }
}
