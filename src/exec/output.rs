// src/exec/output.rs

//! Shared output sinks and the copy helpers executors stream through.
//!
//! Standard output and standard error are the only resources shared between
//! concurrently running jobs. Each [`OutputSink::write_all`] call holds the
//! sink's lock for the whole buffer, so a prefixed line is never split by
//! another job's write.

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex as StdMutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

const COPY_BUF_SIZE: usize = 8 * 1024;

type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Cloneable, append-only handle to a shared writer.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<BoxWriter>>,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl OutputSink {
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::from_writer(tokio::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(tokio::io::stderr())
    }

    /// Sink backed by memory; the returned [`MemoryWriter`] reads it back.
    pub fn memory() -> (Self, MemoryWriter) {
        let buf = MemoryWriter::default();
        (Self::from_writer(buf.clone()), buf)
    }

    /// Write and flush `bytes` as one uninterrupted unit.
    pub async fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(bytes).await?;
        writer.flush().await
    }
}

/// The stdout/stderr pair executors write job output to.
#[derive(Debug, Clone)]
pub struct Streams {
    pub stdout: OutputSink,
    pub stderr: OutputSink,
}

impl Streams {
    pub fn new(stdout: OutputSink, stderr: OutputSink) -> Self {
        Self { stdout, stderr }
    }

    /// The process's own standard output and error.
    pub fn stdio() -> Self {
        Self::new(OutputSink::stdout(), OutputSink::stderr())
    }
}

/// Copy `reader` into `sink` chunk by chunk until EOF.
pub async fn copy_raw<R>(mut reader: R, sink: &OutputSink) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(total);
        }
        sink.write_all(&buf[..n]).await?;
        total += n as u64;
    }
}

/// Splits a byte stream into lines and prefixes each with `[label] `.
///
/// Lines end at `\n`; a trailing `\r` is dropped. Bytes that do not end in a
/// newline are held until more data arrives or [`finish`](Self::finish).
#[derive(Debug)]
pub struct LinePrefixer {
    prefix: Vec<u8>,
    pending: Vec<u8>,
}

impl LinePrefixer {
    pub fn new(label: &str) -> Self {
        Self {
            prefix: format!("[{label}] ").into_bytes(),
            pending: Vec::new(),
        }
    }

    /// Feed a chunk; returns the prefixed complete lines it finished, if any.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop();
            lines.push(self.render(&line));
        }
        lines
    }

    /// Emit the final unterminated line, if any, with a newline appended.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        Some(self.render(&line))
    }

    fn render(&self, line: &[u8]) -> Vec<u8> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let mut out = Vec::with_capacity(self.prefix.len() + line.len() + 1);
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(line);
        out.push(b'\n');
        out
    }
}

/// How one output stream of a job reaches its sink.
#[derive(Debug)]
pub enum StreamWriter {
    Raw(OutputSink),
    Prefixed(OutputSink, LinePrefixer),
}

impl StreamWriter {
    pub fn new(sink: OutputSink, prefix: Option<&str>) -> Self {
        match prefix {
            Some(label) => StreamWriter::Prefixed(sink, LinePrefixer::new(label)),
            None => StreamWriter::Raw(sink),
        }
    }

    pub async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        match self {
            StreamWriter::Raw(sink) => sink.write_all(chunk).await,
            StreamWriter::Prefixed(sink, prefixer) => {
                for line in prefixer.push(chunk) {
                    sink.write_all(&line).await?;
                }
                Ok(())
            }
        }
    }

    pub async fn finish(&mut self) -> io::Result<()> {
        match self {
            StreamWriter::Raw(_) => Ok(()),
            StreamWriter::Prefixed(sink, prefixer) => match prefixer.finish() {
                Some(line) => sink.write_all(&line).await,
                None => Ok(()),
            },
        }
    }
}

/// In-memory `AsyncWrite`; clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<StdMutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, data: &[u8]) -> Poll<io::Result<usize>> {
        self.buf
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(data);
        Poll::Ready(Ok(data.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
