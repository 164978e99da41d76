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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Got an unsupported archive type: {0}")]
    UnsupportedArchiveType(String),

    #[error("Got a gz file but it wasn't a tar.gz")]
    NotATarGz,

    #[error("Could not detect the file type of the archive")]
    UnknownFileType,
}
