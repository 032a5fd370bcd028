// Invite payloads
//
// Field names follow the backend's JSON (camelCase for Komga-derived
// fields, `expire_at` as unix seconds).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which libraries an invited user may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLibraries {
    pub all: bool,
    #[serde(rename = "libraryIds", default)]
    pub library_ids: Vec<String>,
}

/// Restrictions applied to the account created from an invite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteOption {
    #[serde(rename = "labelsAllow", default)]
    pub labels_allow: Option<Vec<String>>,
    #[serde(rename = "labelsExclude", default)]
    pub labels_exclude: Option<Vec<String>>,
    #[serde(rename = "sharedLibraries", default)]
    pub shared_libraries: Option<SharedLibraries>,
    /// Expiry as unix seconds; `None` never expires.
    #[serde(default, alias = "expiresAt")]
    pub expire_at: Option<u64>,
    /// Roles granted to the created account. Only sent when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl InviteOption {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expire_at
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// An invite expires once `now` is strictly past `expire_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| now > at)
    }
}

/// An issued invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteToken {
    pub token: String,
    pub option: InviteOption,
}

/// A library that can be shared through an invite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unavailable: bool,
}

/// Choices available when creating an invite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteConfig {
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invite_option_reads_backend_field_names() {
        let option: InviteOption = serde_json::from_value(json!({
            "labelsAllow": ["kids"],
            "labelsExclude": null,
            "sharedLibraries": { "all": false, "libraryIds": ["lib-1"] },
            "expire_at": 1_700_000_000u64
        }))
        .unwrap();

        assert_eq!(option.labels_allow, Some(vec!["kids".to_string()]));
        assert_eq!(option.labels_exclude, None);
        assert_eq!(
            option.shared_libraries.unwrap().library_ids,
            vec!["lib-1".to_string()]
        );
        assert_eq!(option.expire_at, Some(1_700_000_000));
    }

    #[test]
    fn roles_survive_a_round_trip_and_are_omitted_when_unset() {
        let raw = json!({
            "labelsAllow": null,
            "labelsExclude": null,
            "sharedLibraries": null,
            "expire_at": null,
            "roles": ["FILE_DOWNLOAD", "PAGE_STREAMING"]
        });
        let option: InviteOption = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            option.roles.as_deref(),
            Some(&["FILE_DOWNLOAD".to_string(), "PAGE_STREAMING".to_string()][..])
        );
        assert_eq!(serde_json::to_value(&option).unwrap(), raw);

        let unset = serde_json::to_value(InviteOption::default()).unwrap();
        assert!(unset.get("roles").is_none());
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let option = InviteOption {
            expire_at: Some(1_000),
            ..InviteOption::default()
        };
        let at = DateTime::<Utc>::from_timestamp(1_000, 0).unwrap();
        let after = DateTime::<Utc>::from_timestamp(1_001, 0).unwrap();

        assert!(!option.is_expired(at));
        assert!(option.is_expired(after));
        assert!(!InviteOption::default().is_expired(after));
    }
}
