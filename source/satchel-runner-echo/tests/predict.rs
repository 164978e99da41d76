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

//! End to end tests that launch the real runner binary and talk to it over
//! the runner interface, the way a host would

use std::path::{Path, PathBuf};

use satchel_runner_interface::Runner;

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

fn runner_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_satchel-runner-echo"))
}

fn build_tar(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(file);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.finish().unwrap();
}

#[tokio::test]
async fn test_load_and_infer() {
    init_logging();

    // A content file and a pointer file referencing it
    let dir = tempfile::tempdir().unwrap();
    let content_path = dir.path().join("dummy_output.txt");
    tokio::fs::write(&content_path, "trained content\n")
        .await
        .unwrap();
    let weights_path = dir.path().join("weights");
    tokio::fs::write(&weights_path, format!("{}\n", content_path.display()))
        .await
        .unwrap();

    let runner = Runner::new(&runner_path()).await.unwrap();
    runner.load(Some(weights_path)).await.unwrap();

    let out = runner
        .infer(Some("Hi there".to_owned()), None)
        .await
        .unwrap();
    assert_eq!(
        out,
        "You said: 'Hi there'\n\nContent from model: 'trained content'"
    );

    // No prompt means the default prompt
    let out = runner.infer(None, None).await.unwrap();
    assert_eq!(
        out,
        "You said: 'Hello'\n\nContent from model: 'trained content'"
    );

    // Weights supplied with a request as a tar archive
    let tar_path = dir.path().join("request_weights.tar");
    build_tar(
        &tar_path,
        &[("training/output/dummy_output.txt", "replacement content\n")],
    );

    let out = runner.infer(None, Some(tar_path)).await.unwrap();
    assert_eq!(
        out,
        "You said: 'Hello'\n\nContent from model: 'replacement content'"
    );

    // A broken override keeps the content captured at load time
    let out = runner
        .infer(None, Some(dir.path().join("nope.tar")))
        .await
        .unwrap();
    assert_eq!(
        out,
        "You said: 'Hello'\n\nContent from model: 'trained content'"
    );
}

#[tokio::test]
async fn test_load_without_weights() {
    init_logging();

    let dir = tempfile::tempdir().unwrap();

    let runner = Runner::new(&runner_path()).await.unwrap();
    runner
        .load(Some(dir.path().join("no_such_weights")))
        .await
        .unwrap();

    let out = runner
        .infer(Some("anyone home?".to_owned()), None)
        .await
        .unwrap();
    assert_eq!(
        out,
        "You said: 'anyone home?'\n\nContent from model: 'No weights file found'"
    );
}

#[tokio::test]
async fn test_infer_before_load() {
    init_logging();

    let runner = Runner::new(&runner_path()).await.unwrap();

    let res = runner.infer(Some("too early".to_owned()), None).await;
    assert!(res.is_err());
}
