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

//! This crate contains the interface between a runner and the host that
//! launched it.
//!
//! Runner binaries use [`server::init_runner`] to connect back to the host
//! and then answer requests in a loop. The host side (and this repo's
//! integration tests) use [`Runner`] to launch a runner process and talk to
//! it.

mod client;
mod comms;
mod framed;
pub mod runner;
pub mod server;
pub mod slowlog;
pub mod types;

pub use runner::Runner;
