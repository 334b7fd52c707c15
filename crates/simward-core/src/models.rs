//! Domain records for the session layer.

use serde::{Deserialize, Serialize};

/// Profile record returned by the credential exchange, associated 1:1
/// with the token at issuance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// The unit of session state: one token paired with the profile it was
/// issued for.
///
/// The pair is kept as a single record so both halves are written and
/// cleared atomically; a session is never considered valid with one
/// half missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user: UserProfile,
}
