use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::Message;
use crate::transport::Transport;

/// Timeout for write operations. Reads block indefinitely: a turn only
/// advances when the opponent acts, and a closed socket surfaces as an
/// EOF error on its own.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum frame size. A shot payload tops out at one exclusion area,
/// so anything near this limit is a corrupt or hostile frame.
const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// [`Transport`] over a TCP stream: each message is one bincode frame
/// behind a big-endian u32 length prefix.
pub struct TcpTransport {
    stream: TcpStream,
    max_frame_size: u32,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

fn map_closed(e: io::Error) -> anyhow::Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset => anyhow::anyhow!("connection closed by peer"),
        _ => anyhow::anyhow!("io error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let data =
            bincode::serialize(&msg).map_err(|e| anyhow::anyhow!("serialization error: {}", e))?;
        if data.len() as u32 > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "frame too large: {} bytes (max {})",
                data.len(),
                self.max_frame_size
            ));
        }

        let send_op = async {
            let len = (data.len() as u32).to_be_bytes();
            self.stream.write_all(&len).await.map_err(map_closed)?;
            self.stream.write_all(&data).await.map_err(map_closed)?;
            anyhow::Ok(())
        };
        timeout(SEND_TIMEOUT, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("send timeout after {:?}", SEND_TIMEOUT))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(map_closed)?;
        let len = u32::from_be_bytes(len_buf);

        if len == 0 {
            return Err(anyhow::anyhow!("invalid frame length: 0"));
        }
        if len > self.max_frame_size {
            return Err(anyhow::anyhow!(
                "frame too large: {} bytes (max {})",
                len,
                self.max_frame_size
            ));
        }

        let mut buf = vec![0u8; len as usize];
        self.stream.read_exact(&mut buf).await.map_err(map_closed)?;
        bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("deserialization error: {}", e))
    }
}
