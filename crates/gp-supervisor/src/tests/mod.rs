mod a2s;
mod property_tests;

use crate::probe::HealthInfo;

use chrono::{DateTime, FixedOffset, TimeZone};

/// Wall time in a fixed UTC+0 zone so DST never interferes
pub(crate) fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
}

pub(crate) fn health(name: &str) -> HealthInfo {
    HealthInfo {
        server_name: name.to_string(),
        map_name: "de_dust2".to_string(),
        player_count: 12,
        max_players: 24,
        ping_ms: 8,
    }
}
