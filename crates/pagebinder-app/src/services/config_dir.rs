// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware settings location.

use std::path::{Path, PathBuf};

use pagebinder_core::AppConfig;
use pagebinder_core::error::Result;
use tracing::{debug, info};

/// File name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default settings file: `$XDG_CONFIG_HOME/pagebinder/config.json`, falling
/// back to `~/.config/pagebinder/config.json`.
pub fn default_config_path() -> PathBuf {
    config_base(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("pagebinder")
    .join(CONFIG_FILE_NAME)
}

fn config_base(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return xdg;
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

/// Load the settings for this run.
///
/// An explicitly named file must exist and parse. The default location is
/// optional: when nothing is there the built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => {
            info!(path = %path.display(), "Loading settings");
            AppConfig::load(path)
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                info!(path = %path.display(), "Loading settings");
                AppConfig::load(&path)
            } else {
                debug!(path = %path.display(), "No settings file, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}
