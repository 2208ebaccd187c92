//! Tunable gameplay constants.
//!
//! Defaults reproduce the stock game.  A JSON file may override any subset
//! of fields; the command line then overrides the file.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Point;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    // Loop cadence (ms).
    pub spawn_interval_ms: u64,
    pub enemy_tick_ms: u64,
    pub bullet_tick_ms: u64,

    // Spawner.
    pub max_live_enemies: usize,
    pub spawn_batch_min: u32,
    pub spawn_batch_max: u32,
    pub spawn_x: Range<f32>,
    pub spawn_y: Range<f32>,
    pub enemy_speed: Range<f32>,
    pub enemy_max_health: i32,

    // Movement / collision.
    pub breach_line: f32,
    pub breach_penalty: u32,
    pub purge_line: f32,
    pub corpse_linger_ticks: u32,
    pub bullet_min: f32,
    pub bullet_max: f32,
    pub hit_half_extent: f32,
    pub kill_score: u32,
    /// When set, a bullet keeps flying after a hit and may hit again.
    pub piercing_bullets: bool,

    // Player.
    pub player_max_health: u32,
    pub fire_origin_x: f32,
    pub fire_origin_y: f32,
    /// Bullet displacement per bullet tick.
    pub bullet_speed: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 5000,
            enemy_tick_ms: 50,
            bullet_tick_ms: 30,
            max_live_enemies: 5,
            spawn_batch_min: 1,
            spawn_batch_max: 2,
            spawn_x: 10.0..90.0,
            spawn_y: -10.0..0.0,
            enemy_speed: 0.3..0.6,
            enemy_max_health: 100,
            breach_line: 95.0,
            breach_penalty: 10,
            purge_line: 100.0,
            corpse_linger_ticks: 10,
            bullet_min: -5.0,
            bullet_max: 105.0,
            hit_half_extent: 3.0,
            kill_score: 100,
            piercing_bullets: true,
            player_max_health: 100,
            fire_origin_x: 50.0,
            fire_origin_y: 95.0,
            bullet_speed: 2.0,
        }
    }
}

impl Tunables {
    pub fn fire_origin(&self) -> Point {
        Point::new(self.fire_origin_x, self.fire_origin_y)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let tunables: Tunables = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("enemy_tick_ms", self.enemy_tick_ms),
            ("bullet_tick_ms", self.bullet_tick_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "interval must be at least 1 ms"));
            }
        }

        if self.spawn_batch_min == 0 || self.spawn_batch_min > self.spawn_batch_max {
            return Err(invalid(
                "spawn_batch_min",
                format!(
                    "batch range {}..={} is empty or starts at zero",
                    self.spawn_batch_min, self.spawn_batch_max
                ),
            ));
        }

        for (field, range) in [
            ("spawn_x", &self.spawn_x),
            ("spawn_y", &self.spawn_y),
            ("enemy_speed", &self.enemy_speed),
        ] {
            if !(range.start < range.end) {
                return Err(invalid(
                    field,
                    format!("range {}..{} is empty", range.start, range.end),
                ));
            }
        }

        if self.enemy_speed.start <= 0.0 {
            return Err(invalid("enemy_speed", "enemies must move downwards"));
        }
        if self.bullet_speed <= 0.0 {
            return Err(invalid("bullet_speed", "must be positive"));
        }
        if self.enemy_max_health <= 0 {
            return Err(invalid("enemy_max_health", "must be positive"));
        }
        if self.bullet_min >= self.bullet_max {
            return Err(invalid("bullet_min", "bullet bounds are inverted"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
