//! The single owner of gameplay state.
//!
//! Hosts feed it elapsed time through [`Game::on_tick`] and player commands
//! through [`Game::on_input`], then drain [`GameEvent`]s to play cues and
//! refresh the HUD. Nothing in here blocks or touches the terminal.

use crate::input::Command;
use crate::model::{GameState, Rules};
use crate::motion::{self, TickOutcome};
use crate::progression::{self, MoveOutcome};
use crate::rng::RandomSource;

pub use crate::progression::GameEvent;

pub struct Game {
    state: GameState,
    rules: Rules,
    rng: Box<dyn RandomSource>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(rules: Rules, rng: Box<dyn RandomSource>) -> Self {
        let mut g = Self {
            state: GameState::blank(),
            rules: rules.sanitized(),
            rng,
            events: Vec::new(),
        };
        progression::start_over(&mut g.state, &g.rules, g.rng.as_mut());
        g
    }

    pub fn on_tick(&mut self, delta_ms: f64) -> TickOutcome {
        let out = motion::step(&mut self.state, delta_ms, &self.rules, self.rng.as_mut());
        match out {
            TickOutcome::Hit(idx) => {
                tracing::debug!(bug = idx, level = self.state.level, "player hit");
                progression::collision(
                    &mut self.state,
                    &self.rules,
                    self.rng.as_mut(),
                    &mut self.events,
                );
            }
            TickOutcome::Dropped => {
                tracing::debug!(delta_ms, "dropped long tick");
            }
            TickOutcome::Clear | TickOutcome::Paused => {}
        }
        out
    }

    /// Returns the move result for move commands, `None` otherwise.
    pub fn on_input(&mut self, cmd: Command) -> Option<MoveOutcome> {
        match cmd {
            Command::Move(dir) => {
                if self.state.paused {
                    return Some(MoveOutcome::Blocked);
                }
                Some(progression::attempt_move(
                    &mut self.state,
                    dir,
                    &self.rules,
                    self.rng.as_mut(),
                    &mut self.events,
                ))
            }
            Command::TogglePause => {
                self.state.paused = !self.state.paused;
                tracing::debug!(paused = self.state.paused, "pause toggled");
                None
            }
            Command::Restart => {
                tracing::info!(level = self.state.level, "restart");
                self.state.paused = false;
                progression::start_over(&mut self.state, &self.rules, self.rng.as_mut());
                None
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn key_collected(&self) -> bool {
        self.state.key_collected()
    }

    pub fn paused(&self) -> bool {
        self.state.paused
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// For hosts and tests that need to stage a board.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
