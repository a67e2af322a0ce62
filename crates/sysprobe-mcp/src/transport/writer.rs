//! Serialized response output.

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

use crate::types::{JsonRpcReply, McpResult};

use super::framing;

/// Writes one reply at a time to the output sink.
///
/// The lock covers encoding, writing, and flushing a single reply, so replies
/// never interleave on the wire.
pub struct ResponseWriter<W> {
    sink: Mutex<BufWriter<W>>,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(BufWriter::new(sink)),
        }
    }

    pub async fn write(&self, reply: &JsonRpcReply) -> McpResult<()> {
        let mut sink = self.sink.lock().await;
        let framed = framing::frame_message(reply)?;
        sink.write_all(&framed).await?;
        sink.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;
    use serde_json::json;

    #[tokio::test]
    async fn test_writes_one_line_per_reply() {
        let writer = ResponseWriter::new(Vec::new());
        for n in 1..=2 {
            let id = RequestId::from_json(&n.to_string()).unwrap();
            let reply = JsonRpcReply::from_outcome(id, Ok(json!({"n": n})));
            writer.write(&reply).await.unwrap();
        }
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"n\":1}}\n\
             {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"n\":2}}\n"
        );
    }

    #[tokio::test]
    async fn test_concurrent_writes_do_not_interleave() {
        let writer = std::sync::Arc::new(ResponseWriter::new(Vec::new()));
        let mut tasks = Vec::new();
        for n in 0..16 {
            let writer = writer.clone();
            tasks.push(tokio::spawn(async move {
                let id = RequestId::from_json(&n.to_string()).unwrap();
                let text = "x".repeat(4096);
                let reply = JsonRpcReply::from_outcome(id, Ok(json!({ "text": text })));
                writer.write(&reply).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let writer = std::sync::Arc::try_unwrap(writer).ok().unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 16);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["result"]["text"].as_str().unwrap().len(), 4096);
        }
    }
}
