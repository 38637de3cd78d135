use lanecross::assets::{AssetId, Registry, Sprite};
use lanecross::level::{Layout, Terrain};
use lanecross::model::{Position, GRID_COLS, GRID_ROWS, TILE_W};
use lanecross::Game;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

const HUD_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 1;

const HUD_FG: Color = Color::Rgb {
    r: 230,
    g: 230,
    b: 220,
};
const HUD_BG: Color = Color::Rgb {
    r: 12,
    g: 12,
    b: 16,
};
const ACCENT_FG: Color = Color::Rgb {
    r: 255,
    g: 215,
    b: 80,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn fill(&mut self, fg: Color, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { ch: ' ', fg, bg };
        }
    }

    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Option<Color>) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return;
        }
        let i = self.idx(x as u16, y as u16);
        let bg = bg.unwrap_or(self.cells[i].bg);
        self.cells[i] = Cell { ch, fg, bg };
    }

    pub fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Option<Color>) {
        for (k, ch) in s.chars().enumerate() {
            self.put(x + k as i32, y, ch, fg, bg);
        }
    }
}

/// Where the board sits on screen and how big a tile is in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub term_w: u16,
    pub term_h: u16,
    pub origin_x: i32,
    pub origin_y: i32,
    pub tile_w: i32, // cells
    pub tile_h: i32, // cells
}

pub fn fit_view(term_w: u16, term_h: u16) -> Option<Viewport> {
    let usable_h = term_h.saturating_sub(HUD_ROWS + FOOTER_ROWS) as i32;
    let tile_w = (term_w as i32 / GRID_COLS).min(12);
    let tile_h = (usable_h / GRID_ROWS).min(5);
    if tile_w < 4 || tile_h < 2 {
        return None;
    }
    let board_w = tile_w * GRID_COLS;
    let board_h = tile_h * GRID_ROWS;
    Some(Viewport {
        term_w,
        term_h,
        origin_x: (term_w as i32 - board_w) / 2,
        origin_y: HUD_ROWS as i32 + (usable_h - board_h) / 2,
        tile_w,
        tile_h,
    })
}

impl Viewport {
    fn board_span(&self) -> (i32, i32) {
        (self.origin_x, self.origin_x + self.tile_w * GRID_COLS)
    }

    /// Terminal cell of the left edge / centre line of an entity.
    /// Entity row -1 is the water row, drawn as tile row 0.
    fn cell_of(&self, p: Position) -> (i32, i32) {
        let cx = self.origin_x + ((p.x / TILE_W) * self.tile_w as f64).floor() as i32;
        let cy = self.origin_y + (p.row() + 1) * self.tile_h + self.tile_h / 2;
        (cx, cy)
    }
}

pub struct Toast {
    pub text: String,
    pub frames_left: u32,
}

pub struct Terminal {
    out: io::Stdout,
    pub view: Option<Viewport>,
    prev: CellBuffer,
    pub cur: CellBuffer,
}

impl Terminal {
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        let (cols, rows) = match terminal::size() {
            Ok(size) => size,
            Err(err) => {
                let _ = terminal::disable_raw_mode();
                return Err(err.into());
            }
        };
        Ok(Self {
            out,
            view: fit_view(cols, rows),
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cur.w && r == self.cur.h {
            return Ok(false);
        }
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.view = fit_view(c, r);
        // force a full repaint
        queue!(self.out, Clear(ClearType::All))?;
        tracing::debug!(cols = c, rows = r, "terminal resized");
        Ok(true)
    }

    pub fn bell(&mut self, times: u8) -> anyhow::Result<()> {
        for _ in 0..times {
            queue!(self.out, Print('\u{7}'))?;
        }
        Ok(())
    }

    pub fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.cur.h {
            for x in 0..self.cur.w {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

fn tint(c: Color, color: bool) -> Color {
    if color {
        c
    } else {
        Color::Reset
    }
}

fn terrain_asset(t: Terrain) -> AssetId {
    match t {
        Terrain::Water => AssetId::Water,
        Terrain::Stone => AssetId::Stone,
        Terrain::Grass => AssetId::Grass,
    }
}

fn draw_tiles(buf: &mut CellBuffer, v: &Viewport, layout: &Layout, reg: &Registry, color: bool) {
    for tile in layout.tiles() {
        let Some(s) = reg.sprite(terrain_asset(tile.terrain)) else {
            continue;
        };
        let fill = s.text.chars().next().unwrap_or(' ');
        let bg = s.bg.map(|c| tint(c, color));
        let x0 = v.origin_x + tile.col * v.tile_w;
        let y0 = v.origin_y + tile.row * v.tile_h;
        for dy in 0..v.tile_h {
            for dx in 0..v.tile_w {
                // sparse texture so lanes read as lanes
                let ch = if (dx + dy * 3 + tile.col) % 4 == 0 { fill } else { ' ' };
                buf.put(x0 + dx, y0 + dy, ch, tint(s.fg, color), bg);
            }
        }
        // lane seam
        if tile.terrain == Terrain::Stone && v.tile_h > 2 {
            for dx in 0..v.tile_w {
                buf.put(x0 + dx, y0, '─', tint(Color::DarkGrey, color), bg);
            }
        }
    }
}

/// Centres the sprite text on the entity's tile, clipped to the board.
fn draw_sprite(buf: &mut CellBuffer, v: &Viewport, p: Position, s: &Sprite, color: bool) {
    let (cx, cy) = v.cell_of(p);
    let len = s.text.chars().count() as i32;
    let x0 = cx + (v.tile_w - len) / 2;
    let (left, right) = v.board_span();
    for (k, ch) in s.text.chars().enumerate() {
        let x = x0 + k as i32;
        if x >= left && x < right {
            buf.put(x, cy, ch, tint(s.fg, color), None);
        }
    }
}

pub fn render_frame(
    term: &mut Terminal,
    game: &Game,
    layout: &Layout,
    reg: &Registry,
    toast: Option<&Toast>,
    color: bool,
) {
    let buf = &mut term.cur;
    buf.fill(tint(HUD_FG, color), tint(HUD_BG, color));

    let Some(v) = term.view else {
        buf.put_str(
            0,
            0,
            "Terminal too small. Try at least ~28x15.",
            tint(HUD_FG, color),
            None,
        );
        return;
    };

    draw_tiles(buf, &v, layout, reg, color);

    let st = game.state();
    if let Some(s) = reg.sprite(AssetId::Door) {
        draw_sprite(buf, &v, st.door.pos, s, color);
    }
    if st.key.visible {
        if let Some(s) = reg.sprite(AssetId::Key) {
            draw_sprite(buf, &v, st.key.pos, s, color);
        }
    }
    if let Some(s) = reg.sprite(AssetId::Bug) {
        for e in &st.enemies {
            draw_sprite(buf, &v, e.pos, s, color);
        }
    }
    if let Some(s) = reg.sprite(AssetId::Hero) {
        draw_sprite(buf, &v, st.player.pos, s, color);
    }

    // HUD
    let key_mark = if game.key_collected() { "⚷" } else { "-" };
    let line1 = format!("LANECROSS  |  Level {}   Key {}", game.level(), key_mark);
    buf.put_str(0, 0, &line1, tint(HUD_FG, color), None);
    if game.key_collected() {
        let at = line1.chars().count() as i32 - 1;
        buf.put(at, 0, '⚷', tint(ACCENT_FG, color), None);
    }

    let line2 = match toast {
        Some(t) => t.text.clone(),
        None if game.paused() => "PAUSED  |  Space resume   R restart   Q quit".to_string(),
        None => "Arrows/WASD or swipe to move   Space pause   R restart   Q quit".to_string(),
    };
    let fg2 = if toast.is_some() { ACCENT_FG } else { HUD_FG };
    buf.put_str(0, 1, &line2, tint(fg2, color), None);

    let footer = format!(
        "Grab the key, find the door.   Bugs: {}   ({}x{})",
        st.enemies.len(),
        v.term_w,
        v.term_h
    );
    buf.put_str(
        0,
        v.term_h as i32 - 1,
        &footer,
        tint(HUD_FG, color),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_terminals_have_no_board() {
        assert!(fit_view(20, 40).is_none());
        assert!(fit_view(80, 10).is_none());
    }

    #[test]
    fn board_is_centred_and_capped() {
        let v = fit_view(120, 40).unwrap();
        assert_eq!((v.tile_w, v.tile_h), (12, 5));
        assert_eq!(v.origin_x, (120 - 84) / 2);

        let v = fit_view(28, 15).unwrap();
        assert_eq!((v.tile_w, v.tile_h), (4, 2));
        assert_eq!(v.origin_x, 0);
        assert_eq!(v.origin_y, HUD_ROWS as i32);
    }

    #[test]
    fn entity_rows_sit_one_tile_below_their_index() {
        let v = fit_view(28, 15).unwrap();
        // door row -1 draws inside the water tiles
        let (_, y) = v.cell_of(Position::at_tile(0, -1));
        assert_eq!(y, v.origin_y + 1);
        let (x, y) = v.cell_of(Position::at_tile(3, 4));
        assert_eq!(x, 12);
        assert_eq!(y, v.origin_y + 5 * 2 + 1);
    }

    #[test]
    fn sprites_are_clipped_to_the_board() {
        let v = fit_view(40, 15).unwrap();
        let mut buf = CellBuffer::new(40, 15);
        let s = Sprite {
            text: "<ж>".to_string(),
            fg: Color::Red,
            bg: None,
        };
        draw_sprite(&mut buf, &v, Position { x: -150.0, y: 0.0 }, &s, true);
        let (left, _) = v.board_span();
        assert!(buf.cells.iter().all(|c| c.ch == ' '));
        assert!(left > 0);
    }
}
