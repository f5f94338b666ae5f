//! HTTP statistics API for a Minecraft server.
//!
//! Player and server figures are read live from the host on every request
//! and served as JSON. See [`plugin::StatsPlugin`] for the entry point.

pub mod appdata;
pub mod command;
pub mod common;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod host;
pub mod lookup;
pub mod plugin;
pub mod server;
