//! Byte-source resolution with transparent decompression.
//!
//! A source's logical name decides the codec: a `.gz` suffix selects gzip,
//! anything else is read as-is. Detection is by name only, never by content
//! sniffing. The wrapped reader owns the raw stream, so dropping it releases
//! the whole chain on every exit path.

use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const GZIP_SUFFIX: &str = ".gz";

/// Compression applied to a byte source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionCodec {
    #[default]
    None,
    Gzip,
}

impl CompressionCodec {
    /// Selects the codec for a source name. The suffix match is exact and
    /// case-sensitive.
    pub fn for_name(name: &str) -> Self {
        if name.ends_with(GZIP_SUFFIX) {
            CompressionCodec::Gzip
        } else {
            CompressionCodec::None
        }
    }

    /// Wraps `stream` so reads yield decoded bytes.
    ///
    /// A malformed compression envelope surfaces as an `io::Error` on the
    /// first read, not here.
    pub fn wrap<R: Read + 'static>(self, stream: R) -> Box<dyn Read> {
        match self {
            CompressionCodec::None => Box::new(stream),
            CompressionCodec::Gzip => Box::new(GzDecoder::new(BufReader::new(stream))),
        }
    }
}

/// Opens a file for reading, selecting decompression from its file name.
pub fn open_path(path: &Path) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let codec = path
        .file_name()
        .and_then(OsStr::to_str)
        .map(CompressionCodec::for_name)
        .unwrap_or_default();
    log::debug!("opened {} with {:?} codec", path.display(), codec);
    Ok(codec.wrap(file))
}
