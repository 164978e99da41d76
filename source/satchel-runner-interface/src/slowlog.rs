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

//! Utility function to log if a task is taking a long time

use std::time::{Duration, Instant};

use tokio::sync::oneshot;

pub struct SlowLog {
    done: Option<oneshot::Sender<()>>,
}

impl SlowLog {
    pub fn done(&mut self) {
        if let Some(d) = self.done.take() {
            d.send(()).ok();
        }
    }
}

impl Drop for SlowLog {
    fn drop(&mut self) {
        self.done();
    }
}

pub async fn slowlog<S>(msg: S, interval_seconds: u64) -> SlowLog
where
    S: Into<String>,
{
    let msg = msg.into();

    let (tx, mut rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let start = Instant::now();
        loop {
            match tokio::time::timeout(Duration::from_secs(interval_seconds), &mut rx).await {
                Ok(_) => break,
                Err(_) => {
                    // Get the duration since we started and log
                    let duration = start.elapsed().as_secs();
                    log::info!(target: "slowlog", "Task running for {duration} seconds: {msg}")
                }
            }
        }
    });

    SlowLog { done: Some(tx) }
}
