use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::model::NotificationOutcome;
use super::scanner::DEFAULT_FAILURE_SIGNATURES;

/// Which sound plays for an outcome: one of the bundled templates or a
/// user-supplied file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoundSelection {
    #[default]
    Template1,
    Template2,
    Template3,
    Custom,
}

impl SoundSelection {
    fn template_index(self) -> Option<u8> {
        match self {
            Self::Template1 => Some(1),
            Self::Template2 => Some(2),
            Self::Template3 => Some(3),
            Self::Custom => None,
        }
    }
}

/// Notification settings, persisted as settings.json. Consumed read-only per
/// dispatch; the dispatcher always works from a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub enabled: bool,
    pub toast_enabled: bool,
    #[serde(default)]
    pub success_selection: SoundSelection,
    #[serde(default)]
    pub error_selection: SoundSelection,
    #[serde(default)]
    pub custom_success_sound: Option<PathBuf>,
    #[serde(default)]
    pub custom_error_sound: Option<PathBuf>,
    #[serde(default = "default_volume")]
    pub success_volume: f32,
    #[serde(default = "default_volume")]
    pub error_volume: f32,
    /// Substrings that mark an error log line as a build failure.
    #[serde(default = "default_failure_signatures")]
    pub failure_signatures: Vec<String>,
    /// Directory holding the bundled template sounds.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
}

fn default_volume() -> f32 {
    1.0
}

fn default_failure_signatures() -> Vec<String> {
    DEFAULT_FAILURE_SIGNATURES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("assets/sounds")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            toast_enabled: true,
            success_selection: SoundSelection::default(),
            error_selection: SoundSelection::default(),
            custom_success_sound: None,
            custom_error_sound: None,
            success_volume: default_volume(),
            error_volume: default_volume(),
            failure_signatures: default_failure_signatures(),
            template_dir: default_template_dir(),
        }
    }
}

impl Settings {
    /// Resolve the sound file for an outcome. `None` means no sound is
    /// configured: the Custom selection with an unset or empty path.
    pub fn sound_path(&self, outcome: NotificationOutcome) -> Option<PathBuf> {
        let (selection, custom) = match outcome {
            NotificationOutcome::Success => (self.success_selection, &self.custom_success_sound),
            NotificationOutcome::Failure => (self.error_selection, &self.custom_error_sound),
        };

        match selection.template_index() {
            Some(n) => {
                let stem = match outcome {
                    NotificationOutcome::Success => "success",
                    NotificationOutcome::Failure => "fail",
                };
                Some(self.template_dir.join(format!("{stem}-{n}.mp3")))
            }
            None => custom
                .clone()
                .filter(|path| !path.as_os_str().is_empty()),
        }
    }

    /// Volume for an outcome, clamped to [0, 1].
    pub fn volume(&self, outcome: NotificationOutcome) -> f32 {
        let raw = match outcome {
            NotificationOutcome::Success => self.success_volume,
            NotificationOutcome::Failure => self.error_volume,
        };
        raw.clamp(0.0, 1.0)
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    /// Load settings, falling back to defaults on a missing or unreadable
    /// file.
    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
