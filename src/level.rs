use crate::model::{GRID_COLS, GRID_ROWS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Water,
    Stone,
    Grass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub terrain: Terrain,
    pub col: i32,
    pub row: i32, // tile row; entity row = tile row - 1
}

pub fn terrain_for_row(row: i32) -> Terrain {
    // 0 = water (door lane), 1..=4 stone, 5 = grass start
    match row {
        0 => Terrain::Water,
        r if r == GRID_ROWS - 1 => Terrain::Grass,
        _ => Terrain::Stone,
    }
}

/// Static backdrop, built once.
#[derive(Clone, Debug)]
pub struct Layout {
    tiles: Vec<Tile>,
}

impl Layout {
    pub fn build() -> Self {
        let mut tiles = Vec::with_capacity((GRID_COLS * GRID_ROWS) as usize);
        for row in 0..GRID_ROWS {
            let terrain = terrain_for_row(row);
            for col in 0..GRID_COLS {
                tiles.push(Tile { terrain, col, row });
            }
        }
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, col: i32, row: i32) -> Option<&Tile> {
        if !(0..GRID_COLS).contains(&col) || !(0..GRID_ROWS).contains(&row) {
            return None;
        }
        self.tiles.get((row * GRID_COLS + col) as usize)
    }
}
