use crate::entities::reset_enemy;
use crate::model::{GameState, Position, Rules, HIT_WIDTH, PLAY_WIDTH};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Delta was out of range; nothing moved.
    Dropped,
    Paused,
    Clear,
    /// Index of the first enemy touching the player.
    Hit(usize),
}

/// Same lane, and the 0.75-tile spans intersect.
pub fn overlaps(a: Position, b: Position) -> bool {
    a.y == b.y && a.x + HIT_WIDTH > b.x && b.x + HIT_WIDTH > a.x
}

/// Moves every enemy by `delta_ms`, recycling the ones that ran off the right edge.
pub fn advance(st: &mut GameState, delta_ms: f64, rules: &Rules, rng: &mut dyn RandomSource) {
    for i in 0..st.enemies.len() {
        let e = &mut st.enemies[i];
        e.pos.x += e.speed * delta_ms / rules.speed_divisor_ms;
        if e.pos.x > PLAY_WIDTH {
            reset_enemy(st, i, rules, rng);
        }
    }
}

pub fn first_hit(st: &GameState) -> Option<usize> {
    st.enemies
        .iter()
        .position(|e| overlaps(e.pos, st.player.pos))
}

/// One animation tick: motion, then collision. Does not apply the
/// consequences of a hit; that belongs to progression.
pub fn step(
    st: &mut GameState,
    delta_ms: f64,
    rules: &Rules,
    rng: &mut dyn RandomSource,
) -> TickOutcome {
    if st.paused {
        return TickOutcome::Paused;
    }
    if !delta_ms.is_finite() || delta_ms < 0.0 || delta_ms > rules.max_tick_ms {
        return TickOutcome::Dropped;
    }

    advance(st, delta_ms, rules, rng);

    match first_hit(st) {
        Some(i) => TickOutcome::Hit(i),
        None => TickOutcome::Clear,
    }
}
