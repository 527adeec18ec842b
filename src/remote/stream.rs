use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use super::RemoteEndpoint;
use crate::error::{GameError, Result};
use crate::models::{game::GameResult, player::PlayerId};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Outbound<'a> {
    Targets { targets: &'a [PlayerId] },
    VoteRequest,
    GameOver { result: GameResult },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VoteReply {
    Bare(PlayerId),
    Wrapped { vote: PlayerId },
}

impl From<VoteReply> for PlayerId {
    fn from(reply: VoteReply) -> Self {
        match reply {
            VoteReply::Bare(id) | VoteReply::Wrapped { vote: id } => id,
        }
    }
}

/// Line-delimited JSON over a reader/writer pair. One message per line in
/// both directions.
#[derive(Debug)]
pub struct StreamEndpoint<R, W> {
    reader: R,
    writer: W,
}

impl StreamEndpoint<BufReader<OwnedReadHalf>, OwnedWriteHalf> {
    pub fn from_tcp(socket: TcpStream) -> Self {
        let (read_half, write_half) = socket.into_split();
        Self::new(BufReader::new(read_half), write_half)
    }
}

impl<R, W> StreamEndpoint<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    async fn send(&mut self, message: &Outbound<'_>) -> Result<()> {
        let mut line = serde_json::to_string(message)
            .map_err(|e| GameError::Communication(format!("failed to encode message: {}", e)))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn receive_line(&mut self) -> Result<String> {
        let mut buffer = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buffer).await?;
        if read == 0 {
            return Err(GameError::Communication("connection closed by remote".into()));
        }
        String::from_utf8(buffer)
            .map_err(|e| GameError::InvalidResponse(format!("vote is not valid UTF-8: {}", e)))
    }
}

#[async_trait]
impl<R, W> RemoteEndpoint for StreamEndpoint<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn notify_eligible_targets(&mut self, targets: &[PlayerId]) -> Result<()> {
        self.send(&Outbound::Targets { targets }).await
    }

    async fn request_choice(&mut self) -> Result<PlayerId> {
        self.send(&Outbound::VoteRequest).await?;
        let line = self.receive_line().await?;
        debug!("Received vote payload: {:?}", line.trim_end());
        serde_json::from_str::<VoteReply>(line.trim())
            .map(PlayerId::from)
            .map_err(|e| GameError::InvalidResponse(format!("{:?}: {}", line.trim_end(), e)))
    }

    async fn notify_result(&mut self, result: GameResult) -> Result<()> {
        self.send(&Outbound::GameOver { result }).await
    }
}
