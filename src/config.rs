use crate::color::ColorPair;
use crate::effects::EffectsConfig;
use crate::name::NameAnimConfig;
use crate::scroll_sign::ScrollSignConfig;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Banner shown when the config does not provide one.
pub const DEFAULT_ART: &str = include_str!("../assets/banner.txt");

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub name: NameAnimConfig,
    pub scroll_sign: ScrollSignConfig,
    pub effects: EffectsConfig,
    pub initial_waves: InitialWavesConfig,
    pub keys: KeyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Frames per second of the animation loop.
    pub fps: u32,
    /// Seed for the banner reveal order.
    pub seed: u64,
    /// Multi-line ASCII art for the banner.
    pub art: String,
    /// Colour the banner settles on once revealed.
    pub settled_color: ColorPair,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fps: 25,
            seed: 360,
            art: DEFAULT_ART.to_string(),
            settled_color: ColorPair::WHITE,
        }
    }
}

/// A scripted wave, positioned relative to the first character of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialWave {
    pub x: i32,
    pub y: i32,
    /// Seconds after start, before `delay_secs` is subtracted.
    pub at_secs: f64,
    /// Banner-relative cell that starts this wave when another wave reaches it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<[i32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialWavesConfig {
    /// Subtracted from every `at_secs`.
    pub delay_secs: f64,
    /// Start only the first wave on a timer and let the others fire from their triggers.
    pub chain: bool,
    pub waves: Vec<InitialWave>,
}

impl Default for InitialWavesConfig {
    fn default() -> Self {
        let wave = |x, y, at_secs, trigger| InitialWave {
            x,
            y,
            at_secs,
            trigger,
        };
        Self {
            delay_secs: 2.25,
            chain: false,
            waves: vec![
                wave(6, 4, 5.0, None),
                wave(17, 4, 7.0, Some([15, 5])),
                wave(31, 9, 8.45, Some([29, 9])),
                wave(43, 10, 9.5, Some([41, 10])),
                wave(57, 5, 10.75, Some([57, 5])),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub quit: Vec<String>,
    pub ripple: Vec<String>,
    pub restart: Vec<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: vec!["Esc".to_string(), "q".to_string(), "Ctrl-c".to_string()],
            ripple: vec!["Enter".to_string(), "Space".to_string()],
            restart: vec!["r".to_string()],
        }
    }
}

impl Config {
    /// Reject values the animation maths cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.general.fps == 0 {
            bail!("general.fps must be at least 1");
        }
        if !(self.effects.wave.speed > 0.0) {
            bail!("effects.wave.speed must be positive, got {}", self.effects.wave.speed);
        }
        if !(self.effects.wave.fade_time >= 0.0) {
            bail!(
                "effects.wave.fade_time must not be negative, got {}",
                self.effects.wave.fade_time
            );
        }
        if !(self.name.reveal_speed >= 0.0) || !(self.scroll_sign.reveal_speed >= 0.0) {
            bail!("reveal speeds must not be negative");
        }
        for (name, factor) in [
            ("name.start_row_factor", self.name.start_row_factor),
            ("scroll_sign.start_row_factor", self.scroll_sign.start_row_factor),
        ] {
            if !factor.is_finite() {
                bail!("{name} must be a finite number");
            }
        }
        Ok(())
    }
}

// ============================================================================
// CONFIG LOADING
// ============================================================================

pub fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "textsplash").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the config from the default location, falling back to defaults when
/// it is missing or unreadable.
pub fn load_config() -> Config {
    if let Some(config_path) = get_config_path() {
        if config_path.exists() {
            match load_config_from_path(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), "failed to load config: {e:#}");
                    eprintln!("Warning: {e:#}");
                    eprintln!("Using default configuration.");
                }
            }
        }
    }
    Config::default()
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

pub fn generate_default_config() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default configuration")?;
    Ok(format!(
        r##"## textsplash configuration file
## Place this file at ~/.config/textsplash/config.toml
## All fields are optional - defaults will be used for missing values
##
## Colours are [background, foreground] pairs of palette indices:
## 0 transparent, 1 blue, 2 green, 3 cyan, 4 red, 5 magenta, 6 brown, 7 gray,
## 8 darkgray, 9 lightblue, 10 lightgreen, 11 lightcyan, 12 lightred,
## 13 lightmagenta, 14 lightyellow, 15 white
##
## Key names use the crossterm KeyCode names ("Esc", "Enter", "Space", "q", ...)
## with optional modifiers: "Ctrl-q", "Alt-q", "Shift-Up"

{body}"##
    ))
}

/// Write the default config to the standard location.
pub fn generate_config_file() -> Result<PathBuf> {
    let config_path = get_config_path().context("Could not determine config directory")?;

    let config_dir = config_path.parent().context("Invalid config path")?;

    fs::create_dir_all(config_dir).with_context(|| {
        format!(
            "Failed to create config directory: {}",
            config_dir.display()
        )
    })?;

    fs::write(&config_path, generate_default_config()?)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    Ok(config_path)
}
