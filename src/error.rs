use std::io;
use std::path::PathBuf;

/// Errors surfaced by the scan driver and the classifier.
///
/// `UnsupportedFileType` and `RootNotFound` are fatal and abort before any
/// counting starts; `FileRead` is recorded per path and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{0}` is not a supported source file type")]
    UnsupportedFileType(String),

    #[error("path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Process exit code when the error is fatal. Bad filter values exit
    /// like clap's own usage errors; everything else is a runtime failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnsupportedFileType(_) => 2,
            Error::RootNotFound(_) | Error::FileRead { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_with_clap_convention() {
        let err = Error::UnsupportedFileType("txt".to_string());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "`txt` is not a supported source file type");
    }

    #[test]
    fn test_runtime_errors_exit_nonzero() {
        let missing = Error::RootNotFound(PathBuf::from("/no/such/dir"));
        assert_eq!(missing.exit_code(), 1);

        let read = Error::FileRead {
            path: PathBuf::from("src/lost.cpp"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.exit_code(), 1);
        assert!(
            read.to_string().contains("src/lost.cpp"),
            "message should name the path: {read}"
        );
    }
}
