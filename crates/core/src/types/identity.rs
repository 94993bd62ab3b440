//! The shopper identity used to namespace per-user state.

use serde::{Deserialize, Serialize};

use super::IdentityId;

/// Who is currently shopping.
///
/// Anonymous shoppers get their own locally-keyed state; signed-in shoppers
/// are keyed by the stable token issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    #[default]
    Anonymous,
    User(IdentityId),
}

impl Identity {
    /// Build a signed-in identity.
    #[must_use]
    pub fn user(id: impl Into<IdentityId>) -> Self {
        Self::User(id.into())
    }

    /// Build an identity from an optional provider token.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(t) if !t.is_empty() => Self::User(IdentityId::new(t)),
            _ => Self::Anonymous,
        }
    }

    /// The signed-in id, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<&IdentityId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    /// Namespace segment used in storage keys.
    #[must_use]
    pub fn storage_namespace(&self) -> String {
        match self {
            Self::Anonymous => "guest".to_owned(),
            Self::User(id) => format!("user:{id}"),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::User(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(Identity::from_token(None), Identity::Anonymous);
        assert_eq!(Identity::from_token(Some("  ")), Identity::Anonymous);
        assert_eq!(Identity::from_token(Some("bob")), Identity::user("bob"));
    }

    #[test]
    fn test_storage_namespace() {
        assert_eq!(Identity::Anonymous.storage_namespace(), "guest");
        assert_eq!(Identity::user("bob").storage_namespace(), "user:bob");
    }
}
