use lowkeycraft_stats::appdata::Env;
use lowkeycraft_stats::command::{strip_colors, CommandSender, COMMAND_NAME};
use lowkeycraft_stats::host::memory::MemoryHost;
use lowkeycraft_stats::host::HostServices;
use lowkeycraft_stats::plugin::StatsPlugin;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// The server console: every permission, no colors.
struct Console;

impl CommandSender for Console {
    fn has_permission(&self, _: &str) -> bool {
        true
    }

    fn send_message(&self, message: &str) {
        println!("{}", strip_colors(message));
    }
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let snapshot = std::env::var("STATS_API_HOST_SNAPSHOT").unwrap_or_else(|_| "host.json".to_string());
    let host = match MemoryHost::from_json_file(&snapshot) {
        Ok(host) => host,
        Err(err) => {
            error!("Unable to start: {} ({})", err, snapshot);
            std::process::exit(1);
        }
    };

    let env = match Env::new() {
        Ok(env) => env,
        Err(err) => {
            error!("Unable to start: {}", err);
            std::process::exit(1);
        }
    };

    let plugin = match StatsPlugin::enable(HostServices::from_host(Arc::new(host)), env) {
        Ok(plugin) => plugin,
        Err(err) => {
            error!("Unable to start: {}", err);
            std::process::exit(1);
        }
    };

    info!("Type '{} <status|info|help>' or 'stop'", COMMAND_NAME);
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read console input: {}", e);
                break;
            }
        };

        let mut words = line.split_whitespace();
        match words.next() {
            Some("stop") => break,
            Some(cmd) if cmd.trim_start_matches('/') == COMMAND_NAME => {
                let args: Vec<&str> = words.collect();
                plugin.command().execute(&Console, &args);
            }
            Some(other) => println!("Unknown command '{}'", other),
            None => {}
        }
    }

    if let Err(e) = plugin.disable() {
        error!("Failed to stop cleanly: {}", e);
        std::process::exit(1);
    }
}
