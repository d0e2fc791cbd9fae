pub mod loader;

use std::time::Duration;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::game;
use loader::ConfigError;

/// Points awarded per simultaneous-clear count, before the level multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub single: u32,
    pub double: u32,
    pub triple: u32,
    pub tetris: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            single: game::POINTS_SINGLE,
            double: game::POINTS_DOUBLE,
            triple: game::POINTS_TRIPLE,
            tetris: game::POINTS_TETRIS,
        }
    }
}

impl ScoreTable {
    #[must_use]
    pub fn base_points(&self, rows: usize) -> u32 {
        match rows {
            1 => self.single,
            2 => self.double,
            3 => self.triple,
            4 => self.tetris,
            _ => 0,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub base_tick_ms: u64,
    pub tick_decrement_ms: u64,
    pub tick_floor_ms: u64,
    pub level_up_lines: u32,
    pub score_table: ScoreTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: game::BOARD_WIDTH,
            board_height: game::BOARD_HEIGHT,
            base_tick_ms: game::BASE_TICK_MS,
            tick_decrement_ms: game::TICK_DECREMENT_MS,
            tick_floor_ms: game::TICK_FLOOR_MS,
            level_up_lines: game::LEVEL_UP_LINES,
            score_table: ScoreTable::default(),
        }
    }
}

impl GameConfig {
    /// Fails fast on values that would break the engine's invariants: the
    /// rest of the code assumes valid bounds and nonzero timings thereafter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < 4 {
            return Err(ConfigError::Invalid(format!(
                "board_width must be at least 4, got {}",
                self.board_width
            )));
        }
        if self.board_height < 4 {
            return Err(ConfigError::Invalid(format!(
                "board_height must be at least 4, got {}",
                self.board_height
            )));
        }
        if self.base_tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "base_tick_ms must be positive".to_string(),
            ));
        }
        if self.tick_floor_ms == 0 || self.tick_floor_ms > self.base_tick_ms {
            return Err(ConfigError::Invalid(format!(
                "tick_floor_ms must be in 1..={}, got {}",
                self.base_tick_ms, self.tick_floor_ms
            )));
        }
        if self.level_up_lines == 0 {
            return Err(ConfigError::Invalid(
                "level_up_lines must be positive".to_string(),
            ));
        }
        let table = &self.score_table;
        if table.single == 0 || table.double == 0 || table.triple == 0 || table.tetris == 0 {
            return Err(ConfigError::Invalid(
                "score_table entries must all be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Gravity interval for a level. Shrinks linearly and saturates at the
    /// floor; the level itself is unbounded.
    #[must_use]
    pub fn tick_interval(&self, level: u32) -> Duration {
        let decrement = self.tick_decrement_ms.saturating_mul(u64::from(level));
        let ms = self
            .base_tick_ms
            .saturating_sub(decrement)
            .max(self.tick_floor_ms);
        Duration::from_millis(ms)
    }

    /// Score delta for clearing `rows` lines simultaneously at `level`.
    #[must_use]
    pub fn line_points(&self, rows: usize, level: u32) -> u32 {
        self.score_table
            .base_points(rows)
            .saturating_mul(level.saturating_add(1))
    }
}
