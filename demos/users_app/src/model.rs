use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record
///
/// The password is accepted on input but never written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl User {
    /// Overwrite only the fields present in `patch`.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
    }
}

/// Body of `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `PATCH /users/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut user = User {
            id: Uuid::nil(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "secret".into(),
        };
        user.apply(UserPatch {
            email: Some("alice@example.org".into()),
            ..UserPatch::default()
        });
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.org");
        assert_eq!(user.password, "secret");
    }

    #[test]
    fn test_password_is_not_serialized() {
        let user = User {
            id: Uuid::nil(),
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "hunter2".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["name"], "Bob");
    }
}
