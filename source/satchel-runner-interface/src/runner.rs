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

use std::path::{Path, PathBuf};

use crate::{
    client::Client,
    comms::OwnedComms,
    types::{RequestData, ResponseData},
};

/// A handle to a running runner process
pub struct Runner {
    client: Client,
}

impl Runner {
    /// Launch the runner binary at `runner_path` and wait for it to connect
    pub async fn new(runner_path: &Path) -> Result<Runner, String> {
        use tokio::process::Command;

        // Make sure the runner exists
        if !runner_path.exists() {
            return Err("Runner doesn't exist".into());
        }

        // Create comms
        let (comms, uds_path) = OwnedComms::new().await;

        // Start the runner
        Command::new(runner_path)
            .args(["--uds-path", uds_path.to_str().unwrap()])
            .spawn()
            .expect("Runner failed to start");

        // Create a client
        let client = Client::new(comms).await;

        Ok(Self { client })
    }

    /// Ask the runner to load its model. `weights` overrides the runner's
    /// configured weights pointer file
    pub async fn load(&self, weights: Option<PathBuf>) -> Result<(), String> {
        match self.client.do_rpc(RequestData::Load { weights }).await {
            ResponseData::Load => Ok(()),
            ResponseData::Error { e } => Err(e),
            _ => panic!("Unexpected RPC response type!"),
        }
    }

    /// Run a prediction. `prompt: None` uses the runner's default prompt;
    /// `weights` supplies a weights file for this request only
    pub async fn infer(
        &self,
        prompt: Option<String>,
        weights: Option<PathBuf>,
    ) -> Result<String, String> {
        match self
            .client
            .do_rpc(RequestData::Infer { prompt, weights })
            .await
        {
            ResponseData::Infer { output } => Ok(output),
            ResponseData::Error { e } => Err(e),
            _ => panic!("Unexpected RPC response type!"),
        }
    }
}
