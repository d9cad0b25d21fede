use std::fmt::{self, Debug, Display};

pub type Result<T> = std::result::Result<T, PackError>;

pub enum PackError {
    /// Read or write against the payload or the package file failed.
    Io(std::io::Error),
    /// The deflate codec reported a non-recoverable status.
    Codec(String),
    /// A ZIP writer operation was invoked outside its legal state. This
    /// is a bug in the caller, not a property of the input.
    Protocol(&'static str),
    /// The input tree or the produced byte stream broke a packaging
    /// invariant (missing manifest, offset mismatch, unencodable name).
    Invariant(String),
}

impl Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PackError::Io(e) => write!(f, "io error: {}", e),
            PackError::Codec(msg) => write!(f, "codec error: {}", msg),
            PackError::Protocol(msg) => write!(f, "zip writer protocol error: {}", msg),
            PackError::Invariant(msg) => write!(f, "{}", msg),
        }
    }
}

impl Debug for PackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for PackError {}

impl From<std::io::Error> for PackError {
    fn from(value: std::io::Error) -> Self {
        PackError::Io(value)
    }
}
