use bitcoin::script::PushBytesError;
use thiserror::Error;

/// Errors from reading a single operation out of raw script bytes.
#[derive(Debug, Error)]
pub enum OpReadError {
    /// The read position is at or past the end of the script.
    #[error("unexpected end of script at {0}")]
    UnexpectedEnd(usize),

    /// A declared push length would read past the end of the script.
    #[error("push of {wanted} bytes overruns script ({available} available)")]
    PushOverrun {
        /// Length the push declared.
        wanted: usize,
        /// Bytes actually remaining.
        available: usize,
    },
}

/// Errors from assembling an envelope script.
#[derive(Debug, Error)]
pub enum EnvelopeBuildError {
    /// Error while converting data to `PushBytesBuf`, typically due to
    /// invalid length.
    #[error("pushbytes: {0}")]
    PushBytes(#[from] PushBytesError),
}
