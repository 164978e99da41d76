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

use std::path::Path;

use satchel_utils::config::CONFIG;

use crate::weights;

/// The prompt used when a request doesn't include one
const DEFAULT_PROMPT: &str = "Hello";

/// The "model" is just the content captured when the weights were loaded
pub(crate) struct EchoModel {
    content: String,
}

impl EchoModel {
    /// Load the model (in this case, just read the content the weights
    /// pointer file references)
    pub(crate) async fn load(weights_path: &Path) -> EchoModel {
        EchoModel {
            content: weights::load_default_content(weights_path).await,
        }
    }

    /// Echo the prompt along with the model content
    ///
    /// Weights supplied with the request replace the loaded content for this
    /// request only; if they can't be read, the loaded content is kept
    pub(crate) async fn predict(&self, prompt: Option<String>, weights: Option<&Path>) -> String {
        let prompt = prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_owned());

        let mut content = self.content.clone();
        if let Some(path) = weights {
            if let Some(c) =
                weights::load_override_content(path, &CONFIG.archive_output_name).await
            {
                content = c;
            }
        }

        format!("You said: '{prompt}'\n\nContent from model: '{content}'")
    }
}
