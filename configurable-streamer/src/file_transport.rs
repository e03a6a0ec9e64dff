//! File-backed stream transport for replaying recorded sessions.

use async_trait::async_trait;
use hash_streamer::{ChunkListener, StreamHandle, StreamTransport, TransportFailure};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const COMPONENT: &str = "file_transport";
const REQUEST_EXTENSION: &str = "json";
const STREAM_EXTENSION: &str = "jsonl";

/// Serves `<root>/<uri>.json` for requests and `<root>/<uri>.jsonl` for streams.
///
/// A stream replays one chunk per non-empty line on its own task.
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps `uri` under the root. Parent segments are refused.
    fn path_for(&self, uri: &str, extension: &str) -> Result<PathBuf, TransportFailure> {
        if uri.split('/').any(|segment| segment == "..") {
            return Err(TransportFailure::new(uri, "parent segments are not allowed"));
        }
        Ok(self
            .root
            .join(format!("{}.{extension}", uri.trim_start_matches('/'))))
    }
}

struct FileStreamHandle {
    uri: String,
    task: JoinHandle<()>,
}

#[async_trait]
impl StreamHandle for FileStreamHandle {
    async fn close(&self) {
        self.task.abort();
        debug!(component = COMPONENT, uri = self.uri.as_str(), "stream replay stopped");
    }
}

#[async_trait]
impl StreamTransport for FileTransport {
    async fn connect(
        &self,
        uri: &str,
        listener: Arc<dyn ChunkListener>,
    ) -> Result<Box<dyn StreamHandle>, TransportFailure> {
        let path = self.path_for(uri, STREAM_EXTENSION)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|err| TransportFailure::new(uri, format!("{}: {err}", path.display())))?;

        let owned_uri = uri.to_string();
        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(file).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => listener.on_chunk(line).await,
                    Ok(None) => break,
                    Err(err) => {
                        warn!(
                            component = COMPONENT,
                            uri = owned_uri.as_str(),
                            err = %err,
                            "stream replay aborted"
                        );
                        break;
                    }
                }
            }
        });

        Ok(Box::new(FileStreamHandle {
            uri: uri.to_string(),
            task,
        }))
    }

    async fn request(&self, uri: &str) -> Result<String, TransportFailure> {
        let path = self.path_for(uri, REQUEST_EXTENSION)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| TransportFailure::new(uri, format!("{}: {err}", path.display())))
    }
}
