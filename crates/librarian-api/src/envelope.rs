// Response envelope
//
// Every backend endpoint answers `{ ok, data?, token?, error? }`. Generic
// endpoints carry their payload in `data`; the auth endpoints may carry a
// (rotated) bearer token in `token`. `ok = false` always comes with a
// human-readable `error`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// The standard `{ ok, data, token, error }` wrapper.
///
/// `data` is kept as raw JSON until the caller asks for a concrete type,
/// so an envelope can be inspected before committing to a payload shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Parse a response body. Returns `None` if it is not an envelope.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The server's error message, or a placeholder when it sent none.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "request rejected without a message".into())
    }

    /// Unwrap a generic endpoint's envelope into its typed `data`.
    ///
    /// A missing `data` on success decodes from JSON `null`, so unit and
    /// optional payloads succeed while structured payloads fail to decode.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, Error> {
        if !self.ok {
            return Err(Error::Api {
                message: self.error_message(),
            });
        }

        let data = self.data.unwrap_or(Value::Null);
        serde_json::from_value(data.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: data.to_string(),
        })
    }

    /// Unwrap an auth endpoint's envelope into the optional issued token.
    pub fn into_token(self) -> Result<Option<String>, Error> {
        if self.ok {
            Ok(self.token.filter(|t| !t.is_empty()))
        } else {
            Err(Error::AuthRejected {
                message: self.error_message(),
            })
        }
    }
}
