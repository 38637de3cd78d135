//! Symbolic asset ids resolved to terminal sprites and sound cues.
//!
//! Loading is a separate phase: a [`Loader`] collects entries and
//! [`Loader::finish`] only hands out a [`Registry`] once every id in the
//! manifest has arrived. After that, lookups cannot fail.

use crossterm::style::Color;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Hero,
    Bug,
    Key,
    Door,
    Water,
    Stone,
    Grass,
    Scream,
    Splash,
    DoorOpen,
    Pickup,
}

impl AssetId {
    pub const ALL: [AssetId; 11] = [
        AssetId::Hero,
        AssetId::Bug,
        AssetId::Key,
        AssetId::Door,
        AssetId::Water,
        AssetId::Stone,
        AssetId::Grass,
        AssetId::Scream,
        AssetId::Splash,
        AssetId::DoorOpen,
        AssetId::Pickup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetId::Hero => "hero",
            AssetId::Bug => "bug",
            AssetId::Key => "key",
            AssetId::Door => "door",
            AssetId::Water => "water",
            AssetId::Stone => "stone",
            AssetId::Grass => "grass",
            AssetId::Scream => "scream",
            AssetId::Splash => "splash",
            AssetId::DoorOpen => "door-open",
            AssetId::Pickup => "pickup",
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Drawn centred in the tile; a single char is repeated across it.
    pub text: String,
    pub fg: Color,
    pub bg: Option<Color>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cue {
    pub bells: u8,
    pub toast: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Asset {
    Sprite(Sprite),
    Cue(Cue),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    Missing { id: AssetId },
    Duplicate { id: AssetId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { id } => write!(f, "asset `{id}` never finished loading"),
            Self::Duplicate { id } => write!(f, "asset `{id}` loaded twice"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Default)]
pub struct Loader {
    loaded: HashMap<AssetId, Asset>,
    duplicate: Option<AssetId>,
}

impl Loader {
    pub fn add(&mut self, id: AssetId, asset: Asset) -> &mut Self {
        if self.loaded.insert(id, asset).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(id);
        }
        self
    }

    pub fn finish(self) -> Result<Registry, RegistryError> {
        if let Some(id) = self.duplicate {
            return Err(RegistryError::Duplicate { id });
        }
        if let Some(&id) = AssetId::ALL.iter().find(|id| !self.loaded.contains_key(*id)) {
            return Err(RegistryError::Missing { id });
        }
        tracing::debug!(count = self.loaded.len(), "assets loaded");
        Ok(Registry {
            assets: self.loaded,
        })
    }
}

#[derive(Debug)]
pub struct Registry {
    assets: HashMap<AssetId, Asset>,
}

impl Registry {
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut loader = Loader::default();
        for (id, asset) in builtin_manifest() {
            loader.add(id, asset);
        }
        loader.finish()
    }

    pub fn resolve(&self, id: AssetId) -> &Asset {
        // finish() guarantees every id is present
        &self.assets[&id]
    }

    pub fn sprite(&self, id: AssetId) -> Option<&Sprite> {
        match self.resolve(id) {
            Asset::Sprite(s) => Some(s),
            Asset::Cue(_) => None,
        }
    }

    pub fn cue(&self, id: AssetId) -> Option<&Cue> {
        match self.resolve(id) {
            Asset::Cue(c) => Some(c),
            Asset::Sprite(_) => None,
        }
    }
}

fn sprite(text: &str, fg: Color, bg: Option<Color>) -> Asset {
    Asset::Sprite(Sprite {
        text: text.to_string(),
        fg,
        bg,
    })
}

fn cue(bells: u8, toast: &str) -> Asset {
    Asset::Cue(Cue {
        bells,
        toast: toast.to_string(),
    })
}

pub fn builtin_manifest() -> Vec<(AssetId, Asset)> {
    let rgb = |r, g, b| Color::Rgb { r, g, b };
    vec![
        (AssetId::Hero, sprite("☺", rgb(255, 235, 160), None)),
        (AssetId::Bug, sprite("<ж>", rgb(255, 110, 90), None)),
        (AssetId::Key, sprite("⚷", rgb(255, 215, 80), None)),
        (AssetId::Door, sprite("▐█▌", rgb(200, 150, 90), None)),
        (AssetId::Water, sprite("~", rgb(90, 150, 230), Some(rgb(10, 30, 70)))),
        (AssetId::Stone, sprite(" ", rgb(120, 120, 130), Some(rgb(45, 45, 52)))),
        (AssetId::Grass, sprite("\"", rgb(110, 200, 90), Some(rgb(20, 60, 20)))),
        (AssetId::Scream, cue(3, "AAARGH! Back to level 1")),
        (AssetId::Splash, cue(1, "*splash*")),
        (AssetId::DoorOpen, cue(2, "The door creaks open")),
        (AssetId::Pickup, cue(1, "Got the key")),
    ]
}
