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

//! Bootstrap comms between the host and a runner process: a unix domain
//! socket carrying a single framed RPC channel

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    net::{UnixListener, UnixStream},
    sync::mpsc,
};

use crate::framed::frame;

/// The runner side of the bootstrap socket
pub(crate) struct Comms {
    stream: UnixStream,
}

impl Comms {
    /// Connect to a unix domain socket given a path
    pub(crate) async fn connect(path: &Path) -> Self {
        let stream = UnixStream::connect(path).await.unwrap();

        Self { stream }
    }

    /// A framed transport that can transport serializable things on top of
    /// the stream. Note: this consumes the connection; there is one channel
    /// per bootstrap socket
    pub(crate) async fn get_channel<T, U>(self) -> (mpsc::Sender<T>, mpsc::Receiver<U>)
    where
        T: Debug + Serialize + Send + 'static,
        U: Debug + DeserializeOwned + Send + 'static,
    {
        let (read_stream, write_stream) = self.stream.into_split();
        frame(read_stream, write_stream).await
    }
}

/// A comms instance that "owns" the bootstrap unix domain socket
/// (and will delete it on drop)
pub(crate) struct OwnedComms {
    // A folder that stores the UDS we communicate using
    _tempdir: tempfile::TempDir,

    listener: UnixListener,
}

impl OwnedComms {
    /// Returns Self and the bootstrap path for the other process to connect to
    pub(crate) async fn new() -> (Self, PathBuf) {
        // Create a UDS in a temp dir
        let tempdir = tempfile::tempdir().unwrap();
        let bind_path = tempdir.path().join("bootstrap");

        let listener = UnixListener::bind(&bind_path).unwrap();

        (
            Self {
                _tempdir: tempdir,
                listener,
            },
            bind_path,
        )
    }

    /// Wait for the runner to connect and set up the framed channel on top.
    /// Note: this can only be called once per bootstrap socket
    pub(crate) async fn get_channel<T, U>(&self) -> (mpsc::Sender<T>, mpsc::Receiver<U>)
    where
        T: Debug + Serialize + Send + 'static,
        U: Debug + DeserializeOwned + Send + 'static,
    {
        let stream = match self.listener.accept().await {
            Ok((stream, _)) => stream,
            Err(e) => panic!("Error when connecting: {}", e),
        };

        let (read_stream, write_stream) = stream.into_split();
        frame(read_stream, write_stream).await
    }
}
