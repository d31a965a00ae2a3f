//! Output tailers for a launched server (non-UTF8-safe).
//!
//! The server and its helpers can emit non-UTF8 bytes. Lines are read as bytes
//! and decoded lossily so a stray byte never ends a tailer.
//!
//! Two flavours:
//! - [`spawn_pipe_tailer`] reads a child pipe and copies every line to a log file
//! - [`spawn_file_follower`] follows a log file the child writes to directly

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use spt_core::{OutputStream, ServerOutputSink};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// How often a file follower checks for new output.
const FOLLOW_INTERVAL: Duration = Duration::from_millis(100);

/// Watches lines for the boot marker and fires a one-shot signal once.
pub(crate) struct MarkerWatch {
    marker: &'static str,
    tx: Option<oneshot::Sender<()>>,
}

impl MarkerWatch {
    pub(crate) fn new(marker: &'static str, tx: oneshot::Sender<()>) -> Self {
        Self {
            marker,
            tx: Some(tx),
        }
    }

    fn observe(&mut self, line: &str) {
        if line.contains(self.marker)
            && let Some(tx) = self.tx.take()
        {
            debug!("Boot marker seen");
            let _ = tx.send(());
        }
    }
}

/// Per-line handling shared by both tailer flavours.
struct LineForwarder {
    stream: OutputStream,
    sink: Arc<dyn ServerOutputSink>,
    watch: Option<MarkerWatch>,
}

impl LineForwarder {
    fn forward(&mut self, bytes: &[u8]) {
        let line = String::from_utf8_lossy(trim_newline(bytes));
        if let Some(watch) = self.watch.as_mut() {
            watch.observe(&line);
        }
        self.sink.line(self.stream, &line);
    }
}

fn trim_newline(mut bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\n") {
        bytes = rest;
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
    }
    bytes
}

/// Read `pipe` line by line, appending each line to `log` and forwarding it.
pub(crate) fn spawn_pipe_tailer(
    pipe: impl AsyncRead + Unpin + Send + 'static,
    mut log: File,
    stream: OutputStream,
    sink: Arc<dyn ServerOutputSink>,
    watch: Option<MarkerWatch>,
) -> JoinHandle<()> {
    let mut forwarder = LineForwarder {
        stream,
        sink,
        watch,
    };

    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    if let Err(e) = log.write_all(&buf).await {
                        debug!(%stream, error = %e, "Failed to append to launch log");
                    }
                    forwarder.forward(&buf);
                }
                Err(e) => {
                    debug!(%stream, error = %e, "Tailer exiting due to read error");
                    break;
                }
            }
        }

        let _ = log.flush().await;
        debug!(%stream, "Pipe tailer exiting");
    })
}

/// Follow `path` as it grows, forwarding complete lines.
///
/// Runs until the file becomes unreadable; in practice it is abandoned when
/// the process exits.
pub(crate) fn spawn_file_follower(
    path: PathBuf,
    stream: OutputStream,
    sink: Arc<dyn ServerOutputSink>,
    watch: Option<MarkerWatch>,
) -> JoinHandle<()> {
    let mut forwarder = LineForwarder {
        stream,
        sink,
        watch,
    };

    tokio::spawn(async move {
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cannot follow launch log");
                return;
            }
        };
        let mut reader = BufReader::new(file);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            match reader.read_until(b'\n', &mut buf).await {
                Ok(_) if buf.ends_with(b"\n") => {
                    forwarder.forward(&buf);
                    buf.clear();
                }
                // EOF or a partial line: wait for the writer to catch up.
                Ok(_) => tokio::time::sleep(FOLLOW_INTERVAL).await,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Follower exiting due to read error");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<(OutputStream, String)>>);

    impl ServerOutputSink for Collect {
        fn line(&self, stream: OutputStream, line: &str) {
            self.0.lock().unwrap().push((stream, line.to_string()));
        }
    }

    #[tokio::test]
    async fn pipe_tailer_tees_lines_and_fires_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let log_path = tmp.path().join("out.log");
        let log = File::create(&log_path).await.unwrap();
        let sink = Arc::new(Collect::default());
        let (tx, mut rx) = oneshot::channel();

        let input: &[u8] = b"hello\r\nbad \xff byte\nready!\n";
        spawn_pipe_tailer(
            input,
            log,
            OutputStream::Stdout,
            sink.clone(),
            Some(MarkerWatch::new("ready", tx)),
        )
        .await
        .unwrap();

        assert!(rx.try_recv().is_ok());
        let lines: Vec<String> = sink.0.lock().unwrap().iter().map(|(_, l)| l.clone()).collect();
        assert_eq!(lines, vec!["hello", "bad \u{fffd} byte", "ready!"]);
        assert_eq!(
            std::fs::read(&log_path).unwrap(),
            b"hello\r\nbad \xff byte\nready!\n"
        );
    }

    #[tokio::test]
    async fn file_follower_picks_up_appended_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("follow.log");
        std::fs::write(&path, "first\npart").unwrap();

        let sink = Arc::new(Collect::default());
        let handle = spawn_file_follower(path.clone(), OutputStream::Stderr, sink.clone(), None);

        tokio::time::sleep(Duration::from_millis(300)).await;
        {
            use std::io::Write;
            let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            f.write_all(b"ial\nsecond\n").unwrap();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.abort();

        let got = sink.0.lock().unwrap().clone();
        assert_eq!(
            got,
            vec![
                (OutputStream::Stderr, "first".to_string()),
                (OutputStream::Stderr, "partial".to_string()),
                (OutputStream::Stderr, "second".to_string()),
            ]
        );
    }
}
