use crate::model::Rules;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    pub enable_color: bool,
    /// Ring the terminal bell for sound cues.
    pub bell: bool,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            enable_color: true,
            bell: true,
            seed: None,
            rules: Rules::default(),
        }
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "lanecross", "Lanecross")
        .context("could not resolve project directories")?;
    let config_dir = proj.config_dir().to_path_buf();
    let data_dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating {}", config_dir.display()))?;
    fs::create_dir_all(&data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
    Ok(Paths {
        settings_path: config_dir.join("settings.json"),
        log_path: data_dir.join("lanecross.log"),
    })
}

/// Unreadable or malformed files fall back to defaults; out-of-range rules
/// are pulled back into range.
pub fn load_settings(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return Settings::default(),
    };
    match serde_json::from_str::<Settings>(&raw) {
        Ok(mut s) => {
            let rules = s.rules.clone().sanitized();
            if rules != s.rules {
                tracing::warn!(path = %path.display(), "clamped out-of-range rules");
                s.rules = rules;
            }
            s
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed settings");
            Settings::default()
        }
    }
}

/// Writes defaults on first run so there is something to edit.
pub fn load_or_create_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        let s = Settings::default();
        save_settings_atomic(path, &s)?;
        tracing::info!(path = %path.display(), "wrote default settings");
        return Ok(s);
    }
    Ok(load_settings(path))
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // windows refuses to rename onto an existing file
    if cfg!(windows) && to.exists() {
        fs::remove_file(to).with_context(|| format!("removing {}", to.display()))?;
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(())
}
