//! Persisted filter settings.
//!
//! The settings store the filter selection as coarse levels, the cutoff and the order are
//! derived from them unless an explicit value was chosen that no level represents. They are
//! saved with the `preferences` crate under [`APP_INFO`].

use crate::error::Result;
use crate::filters::filter::{FilterKind, FilterParameters, Pass};
use preferences::{AppInfo, Preferences};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const APP_INFO: AppInfo = AppInfo {
    name: "Spectral Filter",
    author: "Linus Leo Stöckli",
};

/// Preferences key of the filter settings.
pub const SETTINGS_KEY: &str = "config/filter";

/// Highest threshold level, maps to a cutoff of 1023.
pub const MAX_THRESHOLD_LEVEL: u32 = 5;

/// Highest order level, maps to a Butterworth order of 4.
pub const MAX_ORDER_LEVEL: u32 = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub kind: FilterKind,
    pub pass: Pass,
    pub threshold_level: u32,
    pub order_level: u32,
    /// Explicit cutoff, takes precedence over `threshold_level`.
    #[serde(default)]
    pub custom_cutoff: Option<f64>,
    /// Explicit Butterworth order outside the level range, takes precedence over `order_level`.
    #[serde(default)]
    pub custom_order: Option<i32>,
    pub output_dir: PathBuf,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            kind: FilterKind::Ideal,
            pass: Pass::LowPass,
            threshold_level: 2,
            order_level: 0,
            custom_cutoff: None,
            custom_order: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl FilterSettings {
    /// Cutoff radius: the explicit cutoff if set, else `(1 << 2 level) - 1`.
    ///
    /// Levels above [`MAX_THRESHOLD_LEVEL`] are treated as the maximum.
    pub fn cutoff(&self) -> f64 {
        self.custom_cutoff
            .unwrap_or_else(|| cutoff_for_level(self.threshold_level))
    }

    /// Butterworth order: the explicit order if set, else `level + 1`.
    pub fn order(&self) -> i32 {
        self.custom_order
            .unwrap_or(self.order_level.min(MAX_ORDER_LEVEL) as i32 + 1)
    }

    /// Selects a threshold level, dropping an explicit cutoff.
    pub fn set_threshold_level(&mut self, level: u32) {
        self.threshold_level = level.min(MAX_THRESHOLD_LEVEL);
        self.custom_cutoff = None;
    }

    /// Selects an explicit cutoff radius.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        self.custom_cutoff = Some(cutoff);
    }

    /// Selects a Butterworth order. Orders covered by the levels are stored as a level.
    pub fn set_order(&mut self, order: i32) {
        if (1..=MAX_ORDER_LEVEL as i32 + 1).contains(&order) {
            self.order_level = (order - 1) as u32;
            self.custom_order = None;
        } else {
            self.custom_order = Some(order);
        }
    }

    pub fn parameters(&self) -> FilterParameters {
        FilterParameters {
            kind: self.kind,
            cutoff: self.cutoff(),
            order: self.order(),
            pass: self.pass,
        }
    }

    /// Loads the settings from the user preferences. On failure the defaults are saved and
    /// returned.
    pub fn load_or_default() -> Self {
        match FilterSettings::load(&APP_INFO, SETTINGS_KEY) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("could not load filter settings, using defaults: {err:?}");
                let settings = FilterSettings::default();
                if let Err(err) = settings.save(&APP_INFO, SETTINGS_KEY) {
                    log::error!("error in saving filter settings: {err:?}");
                }
                settings
            }
        }
    }

    /// Saves the settings to the user preferences.
    pub fn store(&self) -> Result<()> {
        self.save(&APP_INFO, SETTINGS_KEY)?;
        Ok(())
    }

    /// Saves the settings to an explicit file.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Loads the settings from an explicit file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Ok(FilterSettings::load_from(&mut reader)?)
    }
}

/// Maps a threshold level to a cutoff radius: 0, 3, 15, 63, 255, 1023.
pub fn cutoff_for_level(level: u32) -> f64 {
    let level = level.min(MAX_THRESHOLD_LEVEL);
    ((1u32 << (2 * level)) - 1) as f64
}
