//! The server side of an in-memory connection.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};

pub struct TestPeer {
    pub host: String,
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl TestPeer {
    pub fn new(host: String, stream: DuplexStream) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            host,
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Next line exactly as written, terminator included. `None` on EOF.
    #[allow(dead_code)]
    pub async fn recv_raw(&mut self) -> Option<String> {
        let mut line = String::new();
        let read = tokio::time::timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a line")
            .expect("read failed");
        (read > 0).then_some(line)
    }

    /// Next line with CR-LF stripped.
    #[allow(dead_code)]
    pub async fn recv_line(&mut self) -> Option<String> {
        self.recv_raw()
            .await
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// True once the client closed its end.
    #[allow(dead_code)]
    pub async fn at_eof(&mut self) -> bool {
        let mut rest = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(5), self.reader.read_to_end(&mut rest));
        matches!(read.await, Ok(Ok(_)))
    }

    #[allow(dead_code)]
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("write failed");
        self.writer.flush().await.expect("flush failed");
    }

    /// Close the server side.
    #[allow(dead_code)]
    pub async fn close(mut self) {
        let _ = self.writer.shutdown().await;
    }
}
