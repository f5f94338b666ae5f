//! The `/statsapi` admin command. Purely informational: nothing it does
//! touches player data or the listener.

use crate::appdata::API_NAME;
use crate::plugin::{LifecycleState, SharedState};
use crate::server::ROUTES;
use std::fmt;
use std::sync::Arc;

pub const COMMAND_NAME: &str = "statsapi";
pub const ADMIN_PERMISSION: &str = "lowkeycraftstats.admin";

/// Legacy chat formatting codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatColor {
    Green,
    Yellow,
    White,
    Red,
}

impl fmt::Display for ChatColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ChatColor::Green => 'a',
            ChatColor::Yellow => 'e',
            ChatColor::White => 'f',
            ChatColor::Red => 'c',
        };
        write!(f, "\u{a7}{}", code)
    }
}

/// Remove `§x` codes, for outputs that cannot render them.
pub fn strip_colors(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut chars = message.chars();
    while let Some(c) = chars.next() {
        if c == '\u{a7}' {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

pub trait CommandSender {
    fn has_permission(&self, permission: &str) -> bool;
    fn send_message(&self, message: &str);
}

pub type Authorizer = Arc<dyn Fn(&dyn CommandSender) -> bool + Send + Sync>;

pub fn require_permission(permission: &'static str) -> Authorizer {
    Arc::new(move |sender: &dyn CommandSender| sender.has_permission(permission))
}

pub struct StatsApiCommand {
    port:       u16,
    version:    String,
    state:      SharedState,
    authorize:  Authorizer,
}

impl StatsApiCommand {
    pub fn new(port: u16, version: &str, state: SharedState) -> Self {
        Self::with_authorizer(port, version, state, require_permission(ADMIN_PERMISSION))
    }

    pub fn with_authorizer(port: u16, version: &str, state: SharedState, authorize: Authorizer) -> Self {
        Self {
            port,
            version: version.to_string(),
            state,
            authorize,
        }
    }

    pub fn execute(&self, sender: &dyn CommandSender, args: &[&str]) {
        if !(self.authorize)(sender) {
            sender.send_message(&format!("{}You don't have permission to use this command.", ChatColor::Red));
            return;
        }

        let sub = match args.first() {
            Some(sub) => sub.to_lowercase(),
            None => {
                self.send_usage(sender);
                return;
            }
        };

        match sub.as_str() {
            "status" => self.send_status(sender),
            "info" => self.send_info(sender),
            "help" => self.send_usage(sender),
            _ => {
                sender.send_message(&format!("{}Unknown subcommand: {}", ChatColor::Red, sub));
                self.send_usage(sender);
            }
        }
    }

    fn send_status(&self, sender: &dyn CommandSender) {
        let server = match self.state.get() {
            LifecycleState::Running => format!("Running on port {}", self.port),
            other => other.to_string(),
        };

        sender.send_message(&format!("{}=== {} Status ===", ChatColor::Green, API_NAME));
        line(sender, "API Server", &server);
        line(sender, "PlayerStats", "Enabled");
        line(sender, "Plugin Version", &self.version);
    }

    fn send_info(&self, sender: &dyn CommandSender) {
        sender.send_message(&format!("{}=== {} Info ===", ChatColor::Green, API_NAME));
        sender.send_message(&format!("{}Endpoints:", ChatColor::Yellow));
        for (method, path, description) in ROUTES.iter() {
            sender.send_message(&format!("{}  {} {} - {}", ChatColor::White, method, path, description));
        }
        sender.send_message("");
        sender.send_message(&format!("{}Example:", ChatColor::Yellow));
        sender.send_message(&format!("{}  http://localhost:{}/player/Notch", ChatColor::White, self.port));
    }

    fn send_usage(&self, sender: &dyn CommandSender) {
        sender.send_message(&format!("{}=== {} Commands ===", ChatColor::Green, API_NAME));
        for (sub, what) in [
            ("status", "Check API server status"),
            ("info", "Show available endpoints"),
            ("help", "Show this help message"),
        ] {
            sender.send_message(&format!("{}/{} {}{} - {}", ChatColor::Yellow, COMMAND_NAME, sub, ChatColor::White, what));
        }
    }
}

fn line(sender: &dyn CommandSender, label: &str, value: &str) {
    sender.send_message(&format!("{}{}: {}{}", ChatColor::Yellow, label, ChatColor::White, value));
}
