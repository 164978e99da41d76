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

//! A framed transport on top of an [`AsyncRead`] and [`AsyncWrite`] pair

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter},
    sync::mpsc,
};

/// Send and recv length-prefixed serialized structs on an [`AsyncRead`] and [`AsyncWrite`] pair
///
/// Both tasks exit when the peer hangs up or the local end of a channel is
/// dropped. A closed incoming channel is how a runner observes host shutdown
pub(crate) async fn framed_transport<T, U, R, W>(
    read_stream: R,
    write_stream: W,
    mut outgoing_rx: mpsc::Receiver<T>,
    incoming_tx: mpsc::Sender<U>,
) where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    T: Debug + Serialize + Send + 'static,
    U: Debug + DeserializeOwned + Send + 'static,
{
    // Spawn a task to handle reads
    tokio::spawn(async move {
        let mut br = BufReader::new(read_stream);

        loop {
            // Read the size and then read the data
            let size = match br.read_u64().await {
                Ok(size) => size as usize,
                // The peer hung up
                Err(_) => break,
            };

            let mut data = vec![0u8; size];
            if br.read_exact(&mut data).await.is_err() {
                break;
            }

            // A corrupt frame means the two ends disagree on the protocol
            let item: U = bincode::deserialize(&data).unwrap();

            if incoming_tx.send(item).await.is_err() {
                // The local receiver is gone
                break;
            }
        }
    });

    // Handle writes
    tokio::spawn(async move {
        let mut bw = BufWriter::new(write_stream);
        loop {
            let item = match outgoing_rx.try_recv() {
                Ok(item) => item,
                Err(mpsc::error::TryRecvError::Empty) => {
                    // Nothing to recv
                    // Flush the writer
                    if bw.flush().await.is_err() {
                        break;
                    }

                    // Blocking wait for new things to send
                    match outgoing_rx.recv().await {
                        Some(item) => item,
                        None => break,
                    }
                }
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    // We're done
                    break;
                }
            };

            // Serialize and write size + data to the buffer
            let data = bincode::serialize(&item).unwrap();
            if bw.write_u64(data.len() as _).await.is_err() {
                break;
            }
            if bw.write_all(&data).await.is_err() {
                break;
            }
        }
    });
}

pub(crate) async fn frame<T, U, R, W>(
    read_stream: R,
    write_stream: W,
) -> (mpsc::Sender<T>, mpsc::Receiver<U>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
    T: Debug + Serialize + Send + 'static,
    U: Debug + DeserializeOwned + Send + 'static,
{
    let (send, outgoing_rx) = mpsc::channel(32);
    let (incoming_tx, recv) = mpsc::channel(32);

    // Spawns tasks
    framed_transport(read_stream, write_stream, outgoing_rx, incoming_tx).await;

    (send, recv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let (one, two) = tokio::io::duplex(1024);

        let (one_read, one_write) = tokio::io::split(one);
        let (two_read, two_write) = tokio::io::split(two);

        let (tx, _keep) = frame::<String, String, _, _>(one_read, one_write).await;
        let (_keep, mut rx) = frame::<String, String, _, _>(two_read, two_write).await;

        tx.send("a framed message".to_owned()).await.unwrap();
        tx.send("and another one".to_owned()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "a framed message");
        assert_eq!(rx.recv().await.unwrap(), "and another one");
    }

    #[tokio::test]
    async fn test_peer_hangup_closes_channel() {
        let (one, two) = tokio::io::duplex(1024);

        let (one_read, one_write) = tokio::io::split(one);
        let (_tx, mut rx) = frame::<String, String, _, _>(one_read, one_write).await;

        // Drop the other end of the stream entirely. The read task sees EOF
        // and closes the incoming channel
        drop(two);

        assert!(rx.recv().await.is_none());
    }
}
