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

use clap::Parser;
use tokio::sync::mpsc::{self, error::SendError};

use crate::{
    comms::Comms,
    types::{RPCRequest, RPCResponse, RpcId},
};

pub use crate::types::{RequestData, ResponseData};

pub struct Server {
    outgoing: mpsc::Sender<RPCResponse>,
    incoming: mpsc::Receiver<RPCRequest>,
}

impl Server {
    async fn connect(path: &Path) -> Self {
        let comms = Comms::connect(path).await;

        let (tx, rx) = comms.get_channel().await;

        Server {
            outgoing: tx,
            incoming: rx,
        }
    }

    /// Get the next request from the host. Returns `None` once the host has
    /// hung up, which is the signal to shut down
    pub async fn get_next_request(&mut self) -> Option<RPCRequest> {
        self.incoming.recv().await
    }

    pub async fn send_response_for_request(
        &self,
        req_id: RpcId,
        res: ResponseData,
    ) -> Result<(), SendError<ResponseData>> {
        self.outgoing
            .send(RPCResponse {
                id: req_id,
                data: res,
            })
            .await
            .map_err(|e| SendError(e.0.data))
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    uds_path: String,
}

/// Initialize the runner from command line args and return the server handle
pub async fn init_runner() -> Server {
    let args = Args::parse();

    // Shutdown the runner if the parent process dies
    // NOTE: this technically shuts down if the thread that forked this process dies, but since
    // the parent should be running in tokio, this should be okay because if the parent's tokio
    // runtime goes down, we should go down.
    let res = unsafe { libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL) };
    if res != 0 {
        panic!("prctl failed")
    }

    Server::connect(&PathBuf::from(args.uds_path)).await
}
