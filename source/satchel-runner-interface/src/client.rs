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

use std::sync::{atomic::AtomicU64, Arc};

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};

use crate::{
    comms::OwnedComms,
    types::{RPCRequest, RPCResponse, RequestData, ResponseData, RpcId},
};

pub(crate) struct Client {
    // Keeps the bootstrap socket alive for the lifetime of the connection
    _comms: OwnedComms,

    // RPC handling
    inflight: Arc<DashMap<RpcId, oneshot::Sender<ResponseData>>>,
    rpc_id_gen: AtomicU64,
    rpc_sender: mpsc::Sender<RPCRequest>,
}

impl Client {
    /// Create a new client. The runner process must already have been told
    /// where to connect (see [`crate::runner::Runner`])
    pub(crate) async fn new(comms: OwnedComms) -> Client {
        let (send, mut recv) = comms.get_channel::<RPCRequest, RPCResponse>().await;

        // Hold inflight requests
        let inflight: Arc<DashMap<RpcId, oneshot::Sender<ResponseData>>> = Arc::new(DashMap::new());
        let inflight_clone = inflight.clone();

        // Route responses to the matching inflight request
        tokio::spawn(async move {
            while let Some(response) = recv.recv().await {
                let (_, callback) = inflight_clone
                    .remove(&response.id)
                    .expect("Got a response for an unknown request id");

                // The caller may have gone away; that's fine
                callback.send(response.data).ok();
            }
        });

        Client {
            _comms: comms,
            inflight,
            rpc_id_gen: AtomicU64::new(0),
            rpc_sender: send,
        }
    }

    pub(crate) async fn do_rpc(&self, data: RequestData) -> ResponseData {
        let id = self
            .rpc_id_gen
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let (tx, rx) = oneshot::channel();
        self.inflight.insert(id, tx);

        self.rpc_sender
            .send(RPCRequest { id, data })
            .await
            .unwrap();

        rx.await.unwrap()
    }
}
