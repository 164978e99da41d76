// Copyright 2023 Vivek Panyam
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

//! General configuration for satchel loaded from a config.toml file and the env
//! `Env var` overrides `config.toml` overrides `default`
//!
//! The path to the config file defaults to `~/.satchel/config.toml` and can be
//! overridden by the `SATCHEL_CONFIG_PATH` env var.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::path::PathBuf;

lazy_static! {
    pub static ref CONFIG: SatchelConfig = SatchelConfig::load();
}

#[derive(Deserialize)]
#[serde(default)]
pub struct SatchelConfig {
    /// The weights pointer file read when a model is loaded
    /// Defaults to `weights` (relative to the runner's working directory)
    /// Env: SATCHEL_WEIGHTS_PATH
    pub weights_path: PathBuf,

    /// The file name to look for inside an extracted weights archive
    /// Defaults to `dummy_output.txt`
    /// Env: SATCHEL_ARCHIVE_OUTPUT_NAME
    pub archive_output_name: String,
}

impl Default for SatchelConfig {
    fn default() -> Self {
        Self {
            weights_path: "weights".into(),
            archive_output_name: "dummy_output.txt".into(),
        }
    }
}

impl SatchelConfig {
    fn load() -> SatchelConfig {
        // Load the config
        let mut config = match std::env::var("SATCHEL_CONFIG_PATH") {
            Ok(p) => {
                let config_path: PathBuf = shellexpand::tilde(&p).to_string().into();
                if !config_path.exists() {
                    panic!("SATCHEL_CONFIG_PATH was set to `{p}` which does not exist");
                }

                toml::from_slice(&std::fs::read(config_path).unwrap()).unwrap()
            }

            Err(_) => {
                let config_path: PathBuf = shellexpand::tilde("~/.satchel/config.toml")
                    .to_string()
                    .into();

                if config_path.exists() {
                    toml::from_slice(&std::fs::read(config_path).unwrap()).unwrap()
                } else {
                    SatchelConfig::default()
                }
            }
        };

        // Override with env
        if let Ok(v) = std::env::var("SATCHEL_WEIGHTS_PATH") {
            config.weights_path = shellexpand::tilde(&v).to_string().into();
        }

        if let Ok(v) = std::env::var("SATCHEL_ARCHIVE_OUTPUT_NAME") {
            config.archive_output_name = v;
        }

        config
    }
}
