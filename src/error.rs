use tokio_tungstenite::tungstenite;

/// Errors surfaced by the client and its connections.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no open connection")]
    NotConnected,

    #[error("client has been stopped")]
    Stopped,
}

/// Why an inbound frame was dropped without rendering anything.
///
/// Never fatal to the connection; the dispatcher logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("malformed {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_message() {
        assert_eq!(ClientError::NotConnected.to_string(), "no open connection");
    }

    #[test]
    fn url_error_converts() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
        assert!(err.to_string().starts_with("invalid server url"));
    }

    #[test]
    fn payload_error_names_kind() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = DecodeError::Payload {
            kind: "players_state".into(),
            source,
        };
        assert!(err.to_string().starts_with("malformed players_state payload"));
    }
}
