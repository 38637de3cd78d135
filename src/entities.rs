//! Spawn and reset rules for every entity kind.
//!
//! These are total: any state, any random draw, always lands inside the grid.

use crate::model::{
    Enemy, GameState, Position, Rules, DOOR_ROW, GRID_COLS, LANE_ROWS, START_COL, START_ROW,
    TILE_H, TILE_W,
};
use crate::rng::RandomSource;

pub fn reset_player(st: &mut GameState) {
    st.player.pos = Position::at_tile(START_COL, START_ROW);
}

pub fn reset_key(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    let col = rng.pick(rules.key_min_col.clamp(0, GRID_COLS - 1), GRID_COLS - 1);
    let row = rng.pick(0, LANE_ROWS - 1);
    st.key.pos = Position::at_tile(col, row);
    st.key.visible = true;
    st.key.collected = false;
}

pub fn reset_door(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    let col = rng.pick(rules.key_min_col.clamp(0, GRID_COLS - 1), GRID_COLS - 1);
    st.door.pos = Position::at_tile(col, DOOR_ROW);
}

/// Fresh enemy parked just off the left edge.
pub fn spawn_enemy(level: u32, rules: &Rules, rng: &mut dyn RandomSource) -> Enemy {
    let x = -(rng.unit() + 1.0) * TILE_W;
    let row = rng.pick(0, LANE_ROWS - 1);
    let speed = (rng.unit() + 1.0) * (rng.unit() + 1.0) * rules.level_factor(level);
    Enemy {
        pos: Position {
            x,
            y: row as f64 * TILE_H,
        },
        speed,
    }
}

/// Recycle in place.
pub fn reset_enemy(st: &mut GameState, idx: usize, rules: &Rules, rng: &mut dyn RandomSource) {
    let level = st.level;
    if let Some(slot) = st.enemies.get_mut(idx) {
        *slot = spawn_enemy(level, rules, rng);
    }
}

pub fn push_enemy(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    let e = spawn_enemy(st.level, rules, rng);
    st.enemies.push(e);
}

pub fn trim_enemies(st: &mut GameState, base: usize) {
    st.enemies.truncate(base);
}

/// Pool back to exactly `rules.base_enemies`, every member respawned.
pub fn respawn_enemies(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    trim_enemies(st, rules.base_enemies);
    for i in 0..st.enemies.len() {
        reset_enemy(st, i, rules, rng);
    }
    while st.enemies.len() < rules.base_enemies {
        push_enemy(st, rules, rng);
    }
}

/// Player to the start tile, key and door re-rolled. Enemies untouched.
pub fn reset_level(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    reset_player(st);
    reset_key(st, rules, rng);
    reset_door(st, rules, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PLAY_WIDTH;
    use crate::rng::{Dice, Scripted};

    #[test]
    fn enemy_spawn_follows_draws() {
        // x offset, row, speed a, speed b
        let mut rng = Scripted::new([0.5, 0.6, 0.0, 0.5], 0.0);
        let e = spawn_enemy(1, &Rules::default(), &mut rng);
        assert_eq!(e.pos.x, -150.0);
        assert_eq!(e.pos.y, 2.0 * TILE_H);
        assert_eq!(e.speed, 1.5);
    }

    #[test]
    fn enemy_speed_scales_with_level() {
        let rules = Rules::default();
        let mut rng = Scripted::constant(0.0);
        let e = spawn_enemy(3, &rules, &mut rng);
        assert!((e.speed - 1.2).abs() < 1e-9);
    }

    #[test]
    fn spawns_stay_in_bounds() {
        let rules = Rules::default();
        let mut rng = Dice::seeded(99);
        let mut st = GameState::blank();
        for _ in 0..300 {
            reset_level(&mut st, &rules, &mut rng);
            assert!((1..GRID_COLS).contains(&st.key.pos.col()));
            assert!((0..LANE_ROWS).contains(&st.key.pos.row()));
            assert!((1..GRID_COLS).contains(&st.door.pos.col()));
            assert_eq!(st.door.pos.row(), DOOR_ROW);

            let e = spawn_enemy(1, &rules, &mut rng);
            assert!(e.pos.x < 0.0 && e.pos.x > -2.0 * TILE_W - 1e-9);
            assert!(e.pos.x < PLAY_WIDTH);
            assert!((1.0..4.0).contains(&e.speed));
            assert!((0..LANE_ROWS).contains(&e.pos.row()));
        }
    }

    #[test]
    fn classic_rules_open_column_zero() {
        let mut st = GameState::blank();
        reset_level(&mut st, &Rules::classic(), &mut Scripted::constant(0.0));
        assert_eq!(st.key.pos, Position::at_tile(0, 0));
        assert_eq!(st.door.pos, Position::at_tile(0, DOOR_ROW));

        let mut rng = Dice::seeded(42);
        let (mut key_zero, mut door_zero) = (false, false);
        for _ in 0..300 {
            reset_level(&mut st, &Rules::classic(), &mut rng);
            assert!((0..GRID_COLS).contains(&st.key.pos.col()));
            key_zero |= st.key.pos.col() == 0;
            door_zero |= st.door.pos.col() == 0;
        }
        assert!(key_zero && door_zero);
    }

    #[test]
    fn default_rules_never_use_column_zero() {
        let mut st = GameState::blank();
        reset_level(&mut st, &Rules::default(), &mut Scripted::constant(0.0));
        assert_eq!(st.key.pos.col(), 1);
        assert_eq!(st.door.pos.col(), 1);

        let mut rng = Dice::seeded(42);
        for _ in 0..300 {
            reset_level(&mut st, &Rules::default(), &mut rng);
            assert_ne!(st.key.pos.col(), 0);
            assert_ne!(st.door.pos.col(), 0);
        }
    }

    #[test]
    fn respawn_trims_pool_to_base() {
        let rules = Rules::default();
        let mut rng = Dice::seeded(1);
        let mut st = GameState::blank();
        for _ in 0..8 {
            push_enemy(&mut st, &rules, &mut rng);
        }
        respawn_enemies(&mut st, &rules, &mut rng);
        assert_eq!(st.enemies.len(), rules.base_enemies);
        assert!(st.enemies.iter().all(|e| e.pos.x < 0.0));
    }

    #[test]
    fn player_reset_is_deterministic() {
        let rules = Rules::default();
        let mut rng = Dice::seeded(5);
        let mut st = GameState::blank();
        reset_level(&mut st, &rules, &mut rng);
        let first = st.player;
        reset_level(&mut st, &rules, &mut rng);
        assert_eq!(st.player, first);
        assert_eq!((first.pos.col(), first.pos.row()), (START_COL, START_ROW));
    }
}
