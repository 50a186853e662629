use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the apptimize clients.
///
/// Nothing is retried internally, every failure is handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// More than one attribute payload was passed to a track call.
    #[error("track only supports a single map or struct of key -> value pairs")]
    BadAttributes,
    /// A user id, experiment or event name of `.` or `..`, which no url can carry as a segment.
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("error serializing request body")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to send request")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a status outside of 2xx.
    #[error("{code}: {text}")]
    Status { code: u16, text: String },
    #[error("error parsing apptimize response")]
    Deserialize(#[source] serde_json::Error),
    /// The client could not be built from the given config or options.
    #[error("invalid apptimize config: {0}")]
    Config(String),
}

impl Error {
    /// The HTTP status code, when the error came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
