use serde::{Deserialize, Serialize};

pub const TILE_W: f64 = 100.0;
pub const TILE_H: f64 = 83.0;

pub const GRID_COLS: i32 = 7;
pub const GRID_ROWS: i32 = 6; // water + 4 stone + grass

/// Rows an entity may stand on; the water row above them is entity row -1.
pub const PLAY_ROWS: i32 = GRID_ROWS - 1;
pub const LANE_ROWS: i32 = 4; // stone lanes where bugs run and keys spawn

pub const PLAY_WIDTH: f64 = GRID_COLS as f64 * TILE_W;

/// Horizontal extent used by every overlap test.
pub const HIT_WIDTH: f64 = TILE_W * 0.75;

pub const START_COL: i32 = 3;
pub const START_ROW: i32 = 4;
pub const DOOR_ROW: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64, // px
    pub y: f64, // px
}

impl Position {
    pub fn at_tile(col: i32, row: i32) -> Self {
        Self {
            x: col as f64 * TILE_W,
            y: row as f64 * TILE_H,
        }
    }

    pub fn col(&self) -> i32 {
        (self.x / TILE_W).floor() as i32
    }

    pub fn row(&self) -> i32 {
        (self.y / TILE_H).floor() as i32
    }

    pub fn offset_tiles(&self, dcol: i32, drow: i32) -> Self {
        Self {
            x: self.x + dcol as f64 * TILE_W,
            y: self.y + drow as f64 * TILE_H,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Key {
    pub pos: Position,
    pub visible: bool,
    pub collected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub pos: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Position,
    pub speed: f64,
}

/// Gameplay tuning. Lives in the settings file so variants can be picked
/// without rebuilding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub base_enemies: usize,
    /// Milliseconds that move an enemy of speed 1.0 by one pixel.
    pub speed_divisor_ms: f64,
    /// Ticks reporting more elapsed time than this are dropped.
    pub max_tick_ms: f64,
    /// Lowest column a key or door may spawn in.
    pub key_min_col: i32,
    pub scale_with_level: bool,
    /// One extra bug joins every `grow_every` levels.
    pub grow_every: u32,
    /// Speed bonus per level above 1 when scaling.
    pub speed_step: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            base_enemies: 5,
            speed_divisor_ms: 10.0,
            max_tick_ms: 1000.0,
            key_min_col: 1,
            scale_with_level: true,
            grow_every: 3,
            speed_step: 0.1,
        }
    }
}

impl Rules {
    /// Early-iteration behaviour: fixed difficulty, keys and doors anywhere.
    pub fn classic() -> Self {
        Self {
            key_min_col: 0,
            scale_with_level: false,
            ..Self::default()
        }
    }

    /// Pulls hand-edited values back into ranges the simulation can run
    /// with. Non-finite or non-positive timings fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            base_enemies: self.base_enemies.max(1),
            speed_divisor_ms: positive(self.speed_divisor_ms, d.speed_divisor_ms),
            max_tick_ms: positive(self.max_tick_ms, d.max_tick_ms),
            key_min_col: self.key_min_col.clamp(0, GRID_COLS - 1),
            speed_step: if self.speed_step.is_finite() {
                self.speed_step.max(0.0)
            } else {
                d.speed_step
            },
            ..self
        }
    }

    pub fn level_factor(&self, level: u32) -> f64 {
        if self.scale_with_level {
            1.0 + (level.saturating_sub(1)) as f64 * self.speed_step
        } else {
            1.0
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub level: u32,
    pub paused: bool,
    pub player: Player,
    pub key: Key,
    pub door: Door,
    pub enemies: Vec<Enemy>,
}

impl GameState {
    /// Everything parked at the origin; callers run the reset operations
    /// before the first tick.
    pub fn blank() -> Self {
        let origin = Position { x: 0.0, y: 0.0 };
        Self {
            level: 1,
            paused: false,
            player: Player { pos: origin },
            key: Key {
                pos: origin,
                visible: true,
                collected: false,
            },
            door: Door { pos: origin },
            enemies: Vec::new(),
        }
    }

    pub fn key_collected(&self) -> bool {
        self.key.collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_positions_round_trip_to_grid() {
        let p = Position::at_tile(START_COL, START_ROW);
        assert_eq!(p.x, 300.0);
        assert_eq!(p.y, 332.0);
        assert_eq!((p.col(), p.row()), (3, 4));

        let up = p.offset_tiles(0, -5);
        assert_eq!(up.row(), -1);
    }

    #[test]
    fn level_factor_only_grows_when_scaling() {
        let rules = Rules::default();
        assert_eq!(rules.level_factor(1), 1.0);
        assert!((rules.level_factor(4) - 1.3).abs() < 1e-9);

        let classic = Rules::classic();
        assert_eq!(classic.level_factor(9), 1.0);
        assert_eq!(classic.key_min_col, 0);
    }

    #[test]
    fn sanitized_rules_keep_the_game_running() {
        let bad = Rules {
            base_enemies: 0,
            speed_divisor_ms: 0.0,
            max_tick_ms: -5.0,
            key_min_col: 12,
            speed_step: -0.5,
            ..Rules::default()
        }
        .sanitized();
        assert_eq!(bad.base_enemies, 1);
        assert_eq!(bad.speed_divisor_ms, 10.0);
        assert_eq!(bad.max_tick_ms, 1000.0);
        assert_eq!(bad.key_min_col, GRID_COLS - 1);
        assert_eq!(bad.speed_step, 0.0);
        assert_eq!(bad.level_factor(20), 1.0);

        let odd = Rules {
            speed_divisor_ms: f64::NAN,
            speed_step: f64::INFINITY,
            ..Rules::default()
        }
        .sanitized();
        assert_eq!(odd.speed_divisor_ms, 10.0);
        assert_eq!(odd.speed_step, 0.1);

        assert_eq!(Rules::default().sanitized(), Rules::default());
        assert_eq!(Rules::classic().sanitized(), Rules::classic());
    }

    #[test]
    fn rules_fill_missing_fields_from_defaults() {
        let rules: Rules = serde_json::from_str(r#"{ "base_enemies": 7 }"#).unwrap();
        assert_eq!(rules.base_enemies, 7);
        assert_eq!(rules.max_tick_ms, 1000.0);
        assert!(rules.scale_with_level);
    }
}
