use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Client-held authentication state.
///
/// The token is either absent or a non-empty string the server accepted
/// at login or validation. Cloning captures the token by value.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
}

impl Session {
    /// Empty tokens are normalized to "no token".
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token: token.filter(|t| !t.expose_secret().is_empty()),
        }
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Encode for the durable store.
    pub(crate) fn to_persisted(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&PersistedSession {
            token: self.token.as_ref().map(|t| t.expose_secret().to_owned()),
        })
    }

    /// Decode from the durable store.
    pub(crate) fn from_persisted(raw: &str) -> Result<Self, serde_json::Error> {
        let persisted: PersistedSession = serde_json::from_str(raw)?;
        Ok(Self::new(persisted.token.map(SecretString::from)))
    }
}

/// On-disk shape: `{"token": "..."}`.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default)]
    token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_not_authenticated() {
        assert!(!Session::new(Some(SecretString::from(String::new()))).is_authenticated());
        assert!(Session::new(Some(SecretString::from("abc".to_string()))).is_authenticated());
    }

    #[test]
    fn persisted_form_restores_token() {
        let session = Session::new(Some(SecretString::from("abc".to_string())));
        let raw = session.to_persisted().unwrap();
        assert_eq!(raw, r#"{"token":"abc"}"#);

        let restored = Session::from_persisted(&raw).unwrap();
        assert_eq!(restored.token().unwrap().expose_secret(), "abc");
        assert!(!Session::from_persisted("{}").unwrap().is_authenticated());
    }

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::new(Some(SecretString::from("hunter2".to_string())));
        assert!(!format!("{session:?}").contains("hunter2"));
    }
}
