//! Turns raw host counters into the document served by `/player/{name}`.

use crate::common::{PlayerRecord, Statistic};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TICKS_PER_SECOND: u64 = 20;
pub const TOP_PLAYERS_NOTE: &str = "Top players feature coming soon - requires PlayerStats API integration";

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsDocument {
    pub username:           String,
    pub uuid:               String,
    pub is_online:          bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_join:         Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen:          Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playtime:           Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playtime_ticks:     Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deaths:             Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_kills:       Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mob_kills:          Option<u64>,
    /// Meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_walked:    Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jumps:              Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_dealt:       Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_taken:       Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level:              Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world:              Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note:               Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TopStatistic {
    pub statistic:  String,
    pub note:       String,
}

/// Ranking is not available yet, every statistic gets the same answer.
pub fn top_players(statistic: &str) -> TopStatistic {
    TopStatistic {
        statistic: statistic.to_string(),
        note: TOP_PLAYERS_NOTE.to_string(),
    }
}

/// Render a tick count as the largest non-zero units, e.g. `2d 3h 15m` or `42s`.
pub fn format_playtime(ticks: u64) -> String {
    let seconds = ticks / TICKS_PER_SECOND;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m", days, hours % 24, minutes % 60)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

pub fn meters(centimeters: u64) -> u64 {
    centimeters / 100
}

/// Divides by 10, not 2. Clients already depend on this scale.
pub fn hearts(damage: u64) -> u64 {
    damage / 10
}

/// `None` for zero or negative millis, which the host uses for "never".
pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if millis <= 0 {
        return None;
    }

    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format(DATE_FORMAT).to_string())
}

#[derive(Clone, Debug)]
pub struct StatsFormatter<Tz: TimeZone = Local> {
    tz: Tz,
}

impl StatsFormatter<Local> {
    /// Formats dates in the server's local time.
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl Default for StatsFormatter<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz> StatsFormatter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn format(&self, record: &PlayerRecord) -> StatsDocument {
        let mut doc = StatsDocument {
            username: record.name.clone(),
            uuid: record.uuid.to_string(),
            is_online: record.online,
            first_join: format_timestamp(record.first_played, &self.tz),
            last_seen: format_timestamp(record.last_played, &self.tz),
            note: record.note.clone(),
            ..Default::default()
        };

        if let Some(live) = &record.live {
            let ticks = live.get(Statistic::PlayOneMinute);
            doc.playtime = ticks.map(format_playtime);
            doc.playtime_ticks = ticks;
            doc.deaths = live.get(Statistic::Deaths);
            doc.player_kills = live.get(Statistic::PlayerKills);
            doc.mob_kills = live.get(Statistic::MobKills);
            doc.distance_walked = live.get(Statistic::WalkOneCm).map(meters);
            doc.jumps = live.get(Statistic::Jump);
            doc.damage_dealt = live.get(Statistic::DamageDealt).map(hearts);
            doc.damage_taken = live.get(Statistic::DamageTaken).map(hearts);
            doc.level = live.level;
            doc.world = live.world.clone();
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LiveStats;
    use chrono::Utc;
    use uuid::Uuid;

    fn seconds(s: u64) -> u64 {
        s * TICKS_PER_SECOND
    }

    #[test]
    fn playtime_picks_largest_unit() {
        assert_eq!(format_playtime(0), "0s");
        assert_eq!(format_playtime(125), "6s");
        assert_eq!(format_playtime(seconds(59) + 19), "59s");
        assert_eq!(format_playtime(seconds(60)), "1m 0s");
        assert_eq!(format_playtime(seconds(2 * 60 + 5)), "2m 5s");
        assert_eq!(format_playtime(seconds(3 * 3600 + 4 * 60 + 10)), "3h 4m");
        assert_eq!(format_playtime(seconds(86_400 + 2 * 3600 + 3 * 60 + 4)), "1d 2h 3m");
        assert_eq!(format_playtime(seconds(40 * 86_400)), "40d 0h 0m");
    }

    #[test]
    fn distance_truncates_to_meters() {
        assert_eq!(meters(250), 2);
        assert_eq!(meters(99), 0);
        assert_eq!(meters(100), 1);
    }

    #[test]
    fn damage_uses_tenths() {
        assert_eq!(hearts(15), 1);
        assert_eq!(hearts(9), 0);
        assert_eq!(hearts(200), 20);
    }

    #[test]
    fn timestamps_format_or_vanish() {
        assert_eq!(format_timestamp(1_700_000_000_000, &Utc).as_deref(), Some("2023-11-14 22:13:20"));
        assert_eq!(format_timestamp(0, &Utc), None);
        assert_eq!(format_timestamp(-5, &Utc), None);
    }

    #[test]
    fn formats_live_record() {
        let mut live = LiveStats::default();
        live.counters.insert(Statistic::PlayOneMinute, 125);
        live.counters.insert(Statistic::WalkOneCm, 12_345);
        live.counters.insert(Statistic::DamageTaken, 95);
        live.level = Some(3);
        live.world = Some("world".to_string());

        let record = PlayerRecord {
            name: "Steve".to_string(),
            uuid: Uuid::nil(),
            online: true,
            first_played: 1_700_000_000_000,
            last_played: 0,
            live: Some(live),
            note: None,
        };

        let doc = StatsFormatter::with_timezone(Utc).format(&record);
        assert_eq!(doc.playtime.as_deref(), Some("6s"));
        assert_eq!(doc.playtime_ticks, Some(125));
        assert_eq!(doc.distance_walked, Some(123));
        assert_eq!(doc.damage_taken, Some(9));
        assert_eq!(doc.damage_dealt, None);
        assert_eq!(doc.first_join.as_deref(), Some("2023-11-14 22:13:20"));
        assert_eq!(doc.last_seen, None);
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let record = PlayerRecord {
            name: "Alex".to_string(),
            uuid: Uuid::nil(),
            online: false,
            first_played: 0,
            last_played: 0,
            live: None,
            note: Some("offline".to_string()),
        };

        let json = serde_json::to_value(StatsFormatter::with_timezone(Utc).format(&record)).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["isOnline", "note", "username", "uuid"]);
    }

    #[test]
    fn top_players_is_a_placeholder() {
        let top = top_players("deaths");
        assert_eq!(top.statistic, "deaths");
        assert_eq!(top.note, TOP_PLAYERS_NOTE);
    }
}
