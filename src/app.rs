use crate::render::{render_frame, Terminal, Toast};
use lanecross::assets::{AssetId, Registry};
use lanecross::config::Settings;
use lanecross::input::{collect_input_nonblocking, Action, SwipeTracker};
use lanecross::level::Layout;
use lanecross::{Dice, Game, GameEvent};

use anyhow::Context;
use std::time::{Duration, Instant};

pub struct App {
    settings: Settings,
    game: Game,
    layout: Layout,
    registry: Registry,
    swipe: SwipeTracker,
    toast: Option<Toast>,
    should_quit: bool,
}

fn cue_for(ev: GameEvent) -> AssetId {
    match ev {
        GameEvent::KeyCollected => AssetId::Pickup,
        GameEvent::Splash => AssetId::Splash,
        GameEvent::DoorOpened { .. } => AssetId::DoorOpen,
        GameEvent::Scream { .. } => AssetId::Scream,
    }
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let registry = Registry::builtin().context("loading assets")?;
        let layout = Layout::build();

        let dice = match settings.seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::from_entropy(),
        };
        let game = Game::new(settings.rules.clone(), Box::new(dice));
        tracing::info!(
            seed = ?settings.seed,
            bugs = game.state().enemies.len(),
            scaling = settings.rules.scale_with_level,
            "game ready"
        );

        Ok(Self {
            settings,
            game,
            layout,
            registry,
            swipe: SwipeTracker::default(),
            toast: None,
            should_quit: false,
        })
    }

    fn run(&mut self, term: &mut Terminal) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let toast_frames = fps * 3 / 2;

        let mut last_frame = Instant::now();

        while !self.should_quit {
            term.resize_if_needed()?;

            for action in collect_input_nonblocking(&mut self.swipe, frame_dt)? {
                match action {
                    Action::Quit => {
                        self.should_quit = true;
                        break;
                    }
                    Action::Play(cmd) => {
                        self.game.on_input(cmd);
                    }
                }
            }

            let now = Instant::now();
            let elapsed_ms = now.saturating_duration_since(last_frame).as_secs_f64() * 1000.0;
            last_frame = now;
            self.game.on_tick(elapsed_ms);

            for ev in self.game.drain_events() {
                if let Some(cue) = self.registry.cue(cue_for(ev)) {
                    if self.settings.bell {
                        term.bell(cue.bells)?;
                    }
                    let text = match ev {
                        GameEvent::DoorOpened { level } => {
                            format!("{}: level {}", cue.toast, level)
                        }
                        GameEvent::Scream { lost_on_level } => {
                            format!("{} (lost on level {})", cue.toast, lost_on_level)
                        }
                        _ => cue.toast.clone(),
                    };
                    self.toast = Some(Toast {
                        text,
                        frames_left: toast_frames,
                    });
                }
            }

            render_frame(
                term,
                &self.game,
                &self.layout,
                &self.registry,
                self.toast.as_ref(),
                self.settings.enable_color,
            );
            term.present()?;

            if let Some(t) = self.toast.as_mut() {
                t.frames_left = t.frames_left.saturating_sub(1);
                if t.frames_left == 0 {
                    self.toast = None;
                }
            }

            spin_sleep(frame_dt, now);
        }

        tracing::info!(level = self.game.level(), "quit");
        Ok(())
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    let mut term = Terminal::begin()?;
    let res = app.run(&mut term);
    // restore the terminal even when the loop failed
    let restored = term.end();
    res?;
    restored
}

fn spin_sleep(target: Duration, frame_start: Instant) {
    let end = frame_start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
