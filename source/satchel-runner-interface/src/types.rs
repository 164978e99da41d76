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

//! Wire types shared between a runner and the host

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type RpcId = u64;

#[derive(Debug, Serialize, Deserialize)]
pub struct RPCRequest {
    pub id: RpcId,

    pub data: RequestData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RPCResponse {
    pub id: RpcId,

    pub data: ResponseData,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum RequestData {
    Load {
        /// The weights pointer file to read. `None` uses the runner's
        /// configured default location
        weights: Option<PathBuf>,
    },

    Infer {
        /// The prompt to respond to. `None` uses the runner's default prompt
        prompt: Option<String>,

        /// Weights supplied with this request in place of the ones read at
        /// load time
        weights: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ResponseData {
    Load,

    Infer {
        output: String,
    },

    /// Something went wrong
    Error {
        e: String,
    },
}
