//! Shared helpers for integration tests.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use xylem::{Command, Record};

/// Gzip-compresses a byte slice.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A byte stream that records its own release and can fail mid-read.
///
/// The flag flips when the stream is dropped, which is how every exit path
/// of the adapter is supposed to let go of a source.
pub struct TrackedStream {
    data: io::Cursor<Vec<u8>>,
    fail_after: Option<u64>,
    released: Arc<AtomicBool>,
}

impl TrackedStream {
    pub fn new(data: Vec<u8>) -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        (
            TrackedStream {
                data: io::Cursor::new(data),
                fail_after: None,
                released: Arc::clone(&released),
            },
            released,
        )
    }

    /// Like [`TrackedStream::new`], but reads fail once `fail_after` bytes
    /// have been served.
    pub fn failing(data: Vec<u8>, fail_after: u64) -> (Self, Arc<AtomicBool>) {
        let (mut stream, released) = Self::new(data);
        stream.fail_after = Some(fail_after);
        (stream, released)
    }
}

impl Read for TrackedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_after {
            if self.data.position() >= limit {
                return Err(io::Error::other("injected read failure"));
            }
        }
        self.data.read(buf)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Downstream command whose collected records stay reachable after the
/// command that owns it has been assembled.
#[derive(Clone, Default)]
pub struct SharedCollector {
    records: Arc<Mutex<Vec<Record>>>,
}

impl SharedCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

impl Command for SharedCollector {
    fn process(&mut self, record: Record) -> bool {
        self.records.lock().unwrap().push(record);
        true
    }
}

/// Installs the test logger once.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
