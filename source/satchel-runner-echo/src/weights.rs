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

//! Resolution of weights files into model content
//!
//! The weights read at load time are a *pointer file*: a plain text file
//! whose content is the path of the real content file. Weights supplied with
//! a request are either an archive containing the content file or the
//! content file itself.

use std::path::{Path, PathBuf};

use satchel_runner_interface::slowlog::slowlog;
use satchel_utils::archive;
use walkdir::WalkDir;

/// Content used when there is no weights pointer file at all
const MISSING_WEIGHTS_CONTENT: &str = "No weights file found";

/// Content used when the pointer file exists but the file it references
/// can't be read
const UNREADABLE_CONTENT: &str = "Could not read output file content";

/// Read the weights pointer file and then the content of the file it
/// references. Never fails; both failure modes map to placeholder content
pub(crate) async fn load_default_content(weights_path: &Path) -> String {
    let pointer = match tokio::fs::read_to_string(weights_path).await {
        Ok(pointer) => pointer,
        Err(_) => {
            log::info!("No weights file found, will use default content");
            return MISSING_WEIGHTS_CONTENT.to_owned();
        }
    };

    let output_path = PathBuf::from(pointer.trim());
    match tokio::fs::read_to_string(&output_path).await {
        Ok(content) => {
            let content = content.trim().to_owned();
            log::info!("Loaded content: {content}");
            content
        }
        Err(e) => {
            log::warn!(
                "Could not read output file '{}': {e}",
                output_path.display()
            );
            UNREADABLE_CONTENT.to_owned()
        }
    }
}

/// Load content from weights supplied with a request
///
/// Archives are extracted into a temporary directory and searched for
/// `output_name`; anything else is read directly. Returns `None` if the
/// content couldn't be loaded for any reason, and the caller keeps the
/// content captured at load time
pub(crate) async fn load_override_content(path: &Path, output_name: &str) -> Option<String> {
    log::info!("Using provided weights from: {}", path.display());

    if archive::is_archive(path) {
        let tmpdir = match tempfile::tempdir() {
            Ok(tmpdir) => tmpdir,
            Err(e) => {
                log::warn!("Could not create an extraction dir: {e}");
                return None;
            }
        };

        let mut sl = slowlog(format!("Extracting weights '{}'", path.display()), 5).await;
        let res = archive::extract(path, tmpdir.path()).await;
        sl.done();

        if let Err(e) = res {
            log::warn!("Error extracting weights archive: {e}");
            return None;
        }

        let found = match find_in_dir(tmpdir.path(), output_name) {
            Some(found) => found,
            None => {
                log::warn!("The weights archive did not contain a file named '{output_name}'");
                return None;
            }
        };

        match tokio::fs::read_to_string(&found).await {
            Ok(content) => {
                let content = content.trim().to_owned();
                log::info!("Found and loaded content from {}: {content}", found.display());
                Some(content)
            }
            Err(e) => {
                log::warn!("Could not read '{}' from the archive: {e}", found.display());
                None
            }
        }
    } else {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let content = content.trim().to_owned();
                log::info!("Loaded content directly: {content}");
                Some(content)
            }
            Err(e) => {
                log::warn!("Error reading weights file directly: {e}");
                None
            }
        }
    }
}

/// Find the first file named `name` under `root` (in walk order)
fn find_in_dir(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
}
