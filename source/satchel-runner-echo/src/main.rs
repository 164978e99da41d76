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

use satchel_runner_interface::server::{init_runner, RequestData, ResponseData};
use satchel_utils::config::CONFIG;

use crate::model::EchoModel;

mod model;
mod weights;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = init_runner().await;

    let mut model = None;

    while let Some(req) = server.get_next_request().await {
        let req_id = req.id;
        match req.data {
            RequestData::Load { weights } => {
                // Loading never fails; missing or unreadable weights fall
                // back to placeholder content
                let weights_path = weights.unwrap_or_else(|| CONFIG.weights_path.clone());
                model = Some(EchoModel::load(&weights_path).await);

                server
                    .send_response_for_request(req_id, ResponseData::Load)
                    .await
                    .unwrap();
            }

            RequestData::Infer { prompt, weights } => match &model {
                Some(model) => {
                    let output = model.predict(prompt, weights.as_deref()).await;

                    server
                        .send_response_for_request(req_id, ResponseData::Infer { output })
                        .await
                        .unwrap();
                }
                None => server
                    .send_response_for_request(
                        req_id,
                        ResponseData::Error {
                            e: "Got an infer request before a model was loaded".to_owned(),
                        },
                    )
                    .await
                    .unwrap(),
            },
        }
    }
}
