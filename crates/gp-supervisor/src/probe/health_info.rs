/// Status reported by a reachable server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthInfo {
    pub server_name: String,
    pub map_name: String,
    pub player_count: u32,
    pub max_players: u32,
    /// Round-trip time of the probe
    pub ping_ms: u64,
}

impl HealthInfo {
    pub fn players_label(&self) -> String {
        format!("{}/{}", self.player_count, self.max_players)
    }
}
