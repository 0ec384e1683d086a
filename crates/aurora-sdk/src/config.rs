// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use aurora_core::platform::WindowSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup configuration of an [`Application`](crate::Application).
///
/// Every field is optional in the JSON form; missing fields take their
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// The application name, used as the window title.
    pub name: String,
    /// Initial x-position of the window.
    pub start_pos_x: i32,
    /// Initial y-position of the window.
    pub start_pos_y: i32,
    /// Initial width of the window.
    pub start_width: u32,
    /// Initial height of the window.
    pub start_height: u32,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Aurora Engine Testbed".to_string(),
            start_pos_x: 100,
            start_pos_y: 100,
            start_width: 1280,
            start_height: 720,
        }
    }
}

impl ApplicationConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse application config")
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read application config '{}'", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid application config '{}'", path.display()))
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize application config")
    }

    /// The settings the platform creates the main window with.
    pub fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            title: self.name.clone(),
            x: self.start_pos_x,
            y: self.start_pos_y,
            width: self.start_width,
            height: self.start_height,
        }
    }
}
