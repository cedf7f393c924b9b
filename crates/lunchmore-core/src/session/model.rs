use serde::{Deserialize, Deserializer, Serialize};

/// The current actor and their bearer token.
///
/// A session is authenticated exactly when `token` is non-empty. The zero value
/// (`Session::default()`) is the signed-out state: every field is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Session {
    pub id: String,
    pub email: String,
    #[serde(rename = "org_id")]
    pub organization_id: String,
    pub first_name: String,
    pub last_name: String,
    pub token: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Get the bearer token if the session is authenticated
    pub fn bearer(&self) -> Option<&str> {
        self.is_authenticated().then_some(self.token.as_str())
    }

    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    /// Overlay a patch onto this snapshot. Fields present in the patch win,
    /// absent fields are carried over unchanged.
    pub fn merged(&self, patch: &SessionPatch) -> Session {
        fn pick(patched: &Option<String>, current: &str) -> String {
            patched.clone().unwrap_or_else(|| current.to_string())
        }

        Session {
            id: pick(&patch.id, &self.id),
            email: pick(&patch.email, &self.email),
            organization_id: pick(&patch.organization_id, &self.organization_id),
            first_name: pick(&patch.first_name, &self.first_name),
            last_name: pick(&patch.last_name, &self.last_name),
            token: pick(&patch.token, &self.token),
        }
    }
}

/// Partial session update, as returned by the identity endpoints.
///
/// The server encodes `id` and `org_id` as JSON numbers; both numbers and
/// strings are accepted and kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default, deserialize_with = "id_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "org_id",
        default,
        deserialize_with = "id_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionPatch {
    /// A patch that only replaces the bearer token.
    pub fn token_only(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl From<Session> for SessionPatch {
    fn from(session: Session) -> Self {
        Self {
            id: Some(session.id),
            email: Some(session.email),
            organization_id: Some(session.organization_id),
            first_name: Some(session.first_name),
            last_name: Some(session.last_name),
            token: Some(session.token),
        }
    }
}

/// Accept an identifier written either as a JSON number or a string.
pub(crate) fn id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(|repr| match repr {
        IdRepr::Text(s) => s,
        IdRepr::Unsigned(n) => n.to_string(),
        IdRepr::Signed(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session {
            id: "7".to_string(),
            email: "alice@example.com".to_string(),
            organization_id: "3".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            token: "T0".to_string(),
        }
    }

    #[test]
    fn test_default_session_is_signed_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer(), None);
        assert_eq!(session.full_name(), "");
    }

    #[test]
    fn test_patch_parses_numeric_ids() {
        let json = r#"{"id": 12, "email": "a@b.com", "org_id": 4, "first_name": "A", "last_name": "B", "token": "T1", "password": ""}"#;
        let patch: SessionPatch = serde_json::from_str(json).expect("valid identity json");

        assert_eq!(patch.id.as_deref(), Some("12"));
        assert_eq!(patch.organization_id.as_deref(), Some("4"));
        assert_eq!(patch.token.as_deref(), Some("T1"));
        assert!(patch.has_token());
    }

    #[test]
    fn test_patch_accepts_string_ids_and_missing_fields() {
        let patch: SessionPatch =
            serde_json::from_str(r#"{"id": "u-1", "token": "T"}"#).expect("valid json");
        assert_eq!(patch.id.as_deref(), Some("u-1"));
        assert_eq!(patch.email, None);
        assert_eq!(patch.organization_id, None);
    }

    #[test]
    fn test_merged_keeps_absent_fields() {
        let next = alice().merged(&SessionPatch::token_only("T2"));
        assert_eq!(next.token, "T2");
        assert_eq!(next.email, "alice@example.com");
        assert_eq!(next.full_name(), "Alice Liddell");
    }

    #[test]
    fn test_empty_token_is_not_a_token() {
        assert!(!SessionPatch::token_only("").has_token());
        assert!(!SessionPatch::default().has_token());
    }

    #[test]
    fn test_session_serializes_with_wire_names() {
        let value = serde_json::to_value(alice()).expect("serializable");
        assert_eq!(value["org_id"], "3");
        assert!(value.get("organization_id").is_none());
    }
}
