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

//! Extraction of weights archives. Tar and tar.gz are supported

use flate2::read::GzDecoder;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::error::{ArchiveError, Result};

/// Extracts a tar archive to the output directory
pub async fn extract_tar<P: Into<PathBuf>>(archive: P, out_dir: P) -> Result<()> {
    let archive = archive.into();
    let out_dir = out_dir.into();
    tokio::task::spawn_blocking(move || {
        let tar = std::fs::File::open(archive)?;
        let mut archive = tar::Archive::new(tar);
        archive.unpack(&out_dir)?;
        Ok(())
    })
    .await
    .unwrap()
}

/// Extracts a tar.gz archive to the output directory
pub async fn extract_tar_gz<P: Into<PathBuf>>(archive: P, out_dir: P) -> Result<()> {
    let archive = archive.into();
    let out_dir = out_dir.into();
    tokio::task::spawn_blocking(move || {
        let gz = std::fs::File::open(archive)?;
        let tar = GzDecoder::new(gz);
        let mut archive = tar::Archive::new(tar);
        archive.unpack(&out_dir)?;
        Ok(())
    })
    .await
    .unwrap()
}

/// Returns true if the file at `path` looks like a supported archive.
/// Detection is based on the file content, not the file name; plain text
/// files have no detectable type and return false
pub fn is_archive(path: &Path) -> bool {
    matches!(
        infer::get_from_path(path),
        Ok(Some(kind)) if matches!(kind.mime_type(), "application/x-tar" | "application/gzip")
    )
}

/// Extract an archive (either tar or tar.gz)
// TODO: support zip archives
pub async fn extract(archive: &Path, out_dir: &Path) -> Result<()> {
    let kind = infer::get_from_path(archive)?.ok_or(ArchiveError::UnknownFileType)?;

    match kind.mime_type() {
        "application/x-tar" => extract_tar(archive, out_dir).await,
        "application/gzip" => {
            let gz = std::fs::File::open(archive)?;
            let decoder = GzDecoder::new(gz);

            // We only need the first 261 bytes to tell if it's a tar file
            let mut buf = Vec::with_capacity(512);
            decoder.take(512).read_to_end(&mut buf)?;
            if infer::archive::is_tar(&buf) {
                extract_tar_gz(archive, out_dir).await
            } else {
                Err(ArchiveError::NotATarGz)
            }
        }
        other => Err(ArchiveError::UnsupportedArchiveType(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn build_tar_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[tokio::test]
    async fn test_extract_tar() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("weights.tar");
        std::fs::write(
            &archive,
            build_tar_bytes(&[("nested/dummy_output.txt", "hello from the archive")]),
        )
        .unwrap();
        assert!(is_archive(&archive));

        let out = dir.path().join("out");
        extract(&archive, &out).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("nested/dummy_output.txt")).unwrap(),
            "hello from the archive"
        );
    }

    #[tokio::test]
    async fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("weights.tar.gz");

        let file = std::fs::File::create(&archive).unwrap();
        let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        enc.write_all(&build_tar_bytes(&[("dummy_output.txt", "gzipped content")]))
            .unwrap();
        enc.finish().unwrap();
        assert!(is_archive(&archive));

        let out = dir.path().join("out");
        extract(&archive, &out).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("dummy_output.txt")).unwrap(),
            "gzipped content"
        );
    }

    #[tokio::test]
    async fn test_plain_file_is_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights");
        std::fs::write(&path, "just a path reference\n").unwrap();

        assert!(!is_archive(&path));
        assert!(matches!(
            extract(&path, &dir.path().join("out")).await,
            Err(ArchiveError::UnknownFileType)
        ));
    }

    #[tokio::test]
    async fn test_gz_that_is_not_a_tar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.gz");

        let file = std::fs::File::create(&path).unwrap();
        let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        enc.write_all(b"some text that is definitely not a tar").unwrap();
        enc.finish().unwrap();

        // It sniffs as an archive, but extraction fails cleanly
        assert!(is_archive(&path));
        assert!(matches!(
            extract(&path, &dir.path().join("out")).await,
            Err(ArchiveError::NotATarGz)
        ));
    }

    #[tokio::test]
    async fn test_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            extract(&dir.path().join("nope.tar"), &dir.path().join("out")).await,
            Err(ArchiveError::IOError(_))
        ));
    }
}
