use serde::{Deserialize, Serialize};

use crate::session::model::id_text;

/// A user belonging to the caller's organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "id_text")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Name for list display, falling back to the email address
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

/// Public details of an invite, shown before the invitee joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteInfo {
    #[serde(default)]
    pub org_name: String,
}

/// Response wrapper for `GET /organization/members`. The server writes
/// `null` for an organization with no other members.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MembersResponse {
    #[serde(default)]
    members: Option<Vec<Member>>,
}

impl MembersResponse {
    pub fn into_members(self) -> Vec<Member> {
        self.members.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members_response() {
        let json = r#"{"members": [
            {"id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": "Byron"},
            {"id": 2, "email": "anon@example.com"}
        ]}"#;
        let parsed: MembersResponse = serde_json::from_str(json).expect("valid members json");

        let members = parsed.into_members();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id.as_deref(), Some("1"));
        assert_eq!(members[0].display_name(), "Ada Byron");
        assert_eq!(members[1].display_name(), "anon@example.com");
    }

    #[test]
    fn test_missing_or_null_members_is_empty() {
        let parsed: MembersResponse = serde_json::from_str("{}").expect("valid json");
        assert!(parsed.into_members().is_empty());
        let parsed: MembersResponse =
            serde_json::from_str(r#"{"members": null}"#).expect("valid json");
        assert!(parsed.into_members().is_empty());
    }
}
