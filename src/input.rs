use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (columns, rows); rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// What the game core accepts from the outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Play(Command),
    Quit,
}

/// Two-point swipe: where the pointer went down and where it came up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Gesture {
    /// Dominant axis wins; ties go vertical. A tap (no displacement) is nothing.
    pub fn direction(&self) -> Option<Direction> {
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn press(&mut self, at: (f64, f64)) {
        self.start = Some(at);
    }

    pub fn release(&mut self, at: (f64, f64)) -> Option<Gesture> {
        self.start.take().map(|start| Gesture { start, end: at })
    }

    fn on_mouse(&mut self, m: MouseEvent) -> Option<Gesture> {
        // terminal cells are roughly twice as tall as they are wide
        let at = (m.column as f64, m.row as f64 * 2.0);
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press(at);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.release(at),
            _ => None,
        }
    }
}

pub fn map_key(key: KeyCode, mods: KeyModifiers) -> Option<Action> {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    let dir = match key {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Direction::Right,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
            return Some(Action::Play(Command::TogglePause))
        }
        KeyCode::Char('r') | KeyCode::Char('R') => return Some(Action::Play(Command::Restart)),
        _ => return None,
    };
    Some(Action::Play(Command::Move(dir)))
}

/// Drains whatever crossterm has queued without blocking the frame.
pub fn collect_input_nonblocking(
    swipe: &mut SwipeTracker,
    max_frame_time: Duration,
) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                if let Some(a) = map_key(k.code, k.modifiers) {
                    out.push(a);
                }
            }
            Event::Mouse(m) => {
                if let Some(dir) = swipe.on_mouse(m).and_then(|g| g.direction()) {
                    out.push(Action::Play(Command::Move(dir)));
                }
            }
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}
