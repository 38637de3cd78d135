use crate::entities::{push_enemy, reset_level, reset_player, respawn_enemies};
use crate::input::Direction;
use crate::model::{GameState, Rules, GRID_COLS, PLAY_ROWS};
use crate::motion::overlaps;
use crate::rng::RandomSource;

/// Side effects the host turns into sounds and HUD updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    KeyCollected,
    Splash,
    DoorOpened { level: u32 },
    Scream { lost_on_level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
    /// Jumped into the water away from the door; back to the start tile.
    Dived,
    /// Walked through the door with the key.
    Exited,
}

pub fn attempt_move(
    st: &mut GameState,
    dir: Direction,
    rules: &Rules,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> MoveOutcome {
    let (dcol, drow) = dir.delta();
    let dest = st.player.pos.offset_tiles(dcol, drow);

    if st.key.visible && overlaps(st.key.pos, dest) {
        st.key.visible = false;
        st.key.collected = true;
        events.push(GameEvent::KeyCollected);
        tracing::debug!(level = st.level, "key collected");
    }

    if dest.row() < 0 {
        let at_door = dest.col() == st.door.pos.col();
        return if at_door && st.key.collected {
            advance_level(st, rules, rng, events);
            MoveOutcome::Exited
        } else if !at_door {
            events.push(GameEvent::Splash);
            reset_player(st);
            MoveOutcome::Dived
        } else {
            MoveOutcome::Blocked
        };
    }

    let col = dest.col();
    let row = dest.row();
    if (0..GRID_COLS).contains(&col) && (0..PLAY_ROWS).contains(&row) {
        st.player.pos = dest;
        MoveOutcome::Moved
    } else {
        MoveOutcome::Blocked
    }
}

pub fn advance_level(
    st: &mut GameState,
    rules: &Rules,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) {
    st.level += 1;
    reset_level(st, rules, rng);
    if rules.scale_with_level && rules.grow_every > 0 && st.level % rules.grow_every == 0 {
        push_enemy(st, rules, rng);
        tracing::debug!(level = st.level, bugs = st.enemies.len(), "bug pool grew");
    }
    tracing::info!(level = st.level, "next level");
    events.push(GameEvent::DoorOpened { level: st.level });
}

pub fn collision(
    st: &mut GameState,
    rules: &Rules,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) {
    let lost_on_level = st.level;
    tracing::info!(level = lost_on_level, "lost on level");
    start_over(st, rules, rng);
    events.push(GameEvent::Scream { lost_on_level });
}

/// Level 1 with a fresh board and a base-sized bug pool.
pub fn start_over(st: &mut GameState, rules: &Rules, rng: &mut dyn RandomSource) {
    st.level = 1;
    reset_level(st, rules, rng);
    respawn_enemies(st, rules, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, START_COL, START_ROW};
    use crate::rng::Scripted;

    fn board(door_col: i32, key: (i32, i32)) -> GameState {
        let mut st = GameState::blank();
        reset_player(&mut st);
        st.door.pos = Position::at_tile(door_col, -1);
        st.key.pos = Position::at_tile(key.0, key.1);
        st
    }

    fn go(st: &mut GameState, dir: Direction, ev: &mut Vec<GameEvent>) -> MoveOutcome {
        let mut rng = Scripted::constant(0.0);
        attempt_move(st, dir, &Rules::default(), &mut rng, ev)
    }

    #[test]
    fn cannot_leave_the_grid_sideways_or_down() {
        let mut ev = Vec::new();
        let mut st = board(3, (6, 0));

        st.player.pos = Position::at_tile(0, 2);
        assert_eq!(go(&mut st, Direction::Left, &mut ev), MoveOutcome::Blocked);
        st.player.pos = Position::at_tile(6, 2);
        assert_eq!(go(&mut st, Direction::Right, &mut ev), MoveOutcome::Blocked);
        st.player.pos = Position::at_tile(2, 4);
        assert_eq!(go(&mut st, Direction::Down, &mut ev), MoveOutcome::Blocked);
        assert_eq!(st.player.pos, Position::at_tile(2, 4));
        assert!(ev.is_empty());
    }

    #[test]
    fn stepping_onto_the_key_collects_it() {
        let mut ev = Vec::new();
        let mut st = board(1, (3, 3));

        assert_eq!(go(&mut st, Direction::Up, &mut ev), MoveOutcome::Moved);
        assert!(st.key.collected);
        assert!(!st.key.visible);
        assert_eq!(ev, vec![GameEvent::KeyCollected]);

        // a hidden key is never collected twice
        go(&mut st, Direction::Down, &mut ev);
        go(&mut st, Direction::Up, &mut ev);
        assert_eq!(ev.len(), 1);
    }

    #[test]
    fn water_away_from_door_is_a_dive() {
        let mut ev = Vec::new();
        let mut st = board(5, (6, 3));
        st.player.pos = Position::at_tile(2, 0);

        let out = go(&mut st, Direction::Up, &mut ev);
        assert_eq!(out, MoveOutcome::Dived);
        assert_eq!(ev, vec![GameEvent::Splash]);
        assert_eq!(st.player.pos, Position::at_tile(START_COL, START_ROW));
        assert_eq!(st.level, 1);
    }

    #[test]
    fn door_without_key_just_blocks() {
        let mut ev = Vec::new();
        let mut st = board(2, (6, 3));
        st.player.pos = Position::at_tile(2, 0);

        let out = go(&mut st, Direction::Up, &mut ev);
        assert_eq!(out, MoveOutcome::Blocked);
        assert!(ev.is_empty());
        assert_eq!(st.player.pos, Position::at_tile(2, 0));
    }

    #[test]
    fn pool_grows_on_every_third_level() {
        let rules = Rules::default();
        let mut rng = Scripted::constant(0.0);
        let mut ev = Vec::new();
        let mut st = GameState::blank();
        start_over(&mut st, &rules, &mut rng);
        assert_eq!(st.enemies.len(), 5);

        advance_level(&mut st, &rules, &mut rng, &mut ev);
        assert_eq!((st.level, st.enemies.len()), (2, 5));
        advance_level(&mut st, &rules, &mut rng, &mut ev);
        assert_eq!((st.level, st.enemies.len()), (3, 6));
        for _ in 0..3 {
            advance_level(&mut st, &rules, &mut rng, &mut ev);
        }
        assert_eq!((st.level, st.enemies.len()), (6, 7));
        assert_eq!(ev.last(), Some(&GameEvent::DoorOpened { level: 6 }));

        collision(&mut st, &rules, &mut rng, &mut ev);
        assert_eq!((st.level, st.enemies.len()), (1, 5));
        assert_eq!(ev.last(), Some(&GameEvent::Scream { lost_on_level: 6 }));
    }

    #[test]
    fn classic_rules_keep_the_pool_fixed() {
        let rules = Rules::classic();
        let mut rng = Scripted::constant(0.0);
        let mut ev = Vec::new();
        let mut st = GameState::blank();
        start_over(&mut st, &rules, &mut rng);
        for _ in 0..9 {
            advance_level(&mut st, &rules, &mut rng, &mut ev);
        }
        assert_eq!(st.enemies.len(), 5);
    }
}
