use thiserror::Error;
use xylem_tree::BuildError;

/// Failures while turning a byte source into a document tree.
///
/// I/O problems and ill-formed XML are kept apart: a broken pipe is not a
/// broken document, and callers route them differently.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { message: String, position: u64 },
    #[error("tree construction error: {0}")]
    Build(#[from] BuildError),
    #[error("invalid UTF-8 in input: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl IngestError {
    /// Maps a reader-reported failure, unwrapping I/O errors so they stay
    /// distinct from well-formedness violations.
    pub(crate) fn from_reader(error: quick_xml::Error, position: u64) -> Self {
        match error {
            quick_xml::Error::Io(io) => {
                IngestError::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => IngestError::Malformed {
                message: other.to_string(),
                position,
            },
        }
    }

    pub(crate) fn malformed(message: impl Into<String>, position: u64) -> Self {
        IngestError::Malformed {
            message: message.into(),
            position,
        }
    }
}
