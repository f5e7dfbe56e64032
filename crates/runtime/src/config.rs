//! Runtime configuration shared by the service facade and the NPC runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cooldown::CooldownTracker;

/// Tunable parameters plus the on-disk layout of the four registries.
///
/// Each registry owns one subdirectory of `data_dir`, one document per
/// entity, file stem = logical name.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Root of the plugin's data directory.
    pub data_dir: PathBuf,
    /// Retention window for the cooldown sweep.
    pub cooldown_retention: Duration,
    /// How often (in ticks) the cooldown sweep runs.
    pub sweep_interval_ticks: u64,
    /// How often (in ticks) name/score tags are re-resolved for viewers.
    pub name_tag_refresh_ticks: u64,
}

impl RuntimeConfig {
    pub const DEFAULT_SWEEP_INTERVAL_TICKS: u64 = 1200;
    pub const DEFAULT_NAME_TAG_REFRESH_TICKS: u64 = 20;

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cooldown_retention: CooldownTracker::DEFAULT_RETENTION,
            sweep_interval_ticks: Self::DEFAULT_SWEEP_INTERVAL_TICKS,
            name_tag_refresh_ticks: Self::DEFAULT_NAME_TAG_REFRESH_TICKS,
        }
    }

    pub fn skins_dir(&self) -> PathBuf {
        self.data_dir.join("skins")
    }

    pub fn capes_dir(&self) -> PathBuf {
        self.data_dir.join("capes")
    }

    pub fn dialogs_dir(&self) -> PathBuf {
        self.data_dir.join("dialogs")
    }

    pub fn npcs_dir(&self) -> PathBuf {
        self.data_dir.join("npcs")
    }

    pub fn registry_dirs(&self) -> [PathBuf; 4] {
        [
            self.skins_dir(),
            self.capes_dir(),
            self.dialogs_dir(),
            self.npcs_dir(),
        ]
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(Path::new("data"))
    }
}
