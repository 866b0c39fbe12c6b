use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rule::{NamespaceUid, OrgId};

/// User identifier.
pub type UserId = i64;

/// A named scope that partitions rule groups within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Namespace {
    pub uid: NamespaceUid,
    /// Human-readable identifier used in request paths.
    pub slug: String,
    /// Display name used as the key of org-wide documents.
    pub title: String,
    pub org_id: OrgId,
}

impl Namespace {
    /// Build a namespace whose slug is derived from its title.
    pub fn new(uid: impl Into<String>, title: impl Into<String>, org_id: OrgId) -> Self {
        let title = title.into();
        Self {
            uid: uid.into(),
            slug: slugify(&title),
            title,
            org_id,
        }
    }
}

/// Role of a user inside its current organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum OrgRole {
    #[default]
    Viewer,
    Editor,
    Admin,
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgRole::Viewer => write!(f, "Viewer"),
            OrgRole::Editor => write!(f, "Editor"),
            OrgRole::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Viewer" => Ok(OrgRole::Viewer),
            "Editor" => Ok(OrgRole::Editor),
            "Admin" => Ok(OrgRole::Admin),
            other => Err(format!("unknown org role: '{}'", other)),
        }
    }
}

/// The acting principal of a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedInUser {
    pub user_id: UserId,
    pub org_id: OrgId,
    pub login: String,
    pub org_role: OrgRole,
}

impl SignedInUser {
    pub fn new(user_id: UserId, org_id: OrgId, login: impl Into<String>, org_role: OrgRole) -> Self {
        Self {
            user_id,
            org_id,
            login: login.into(),
            org_role,
        }
    }

    pub fn has_role(&self, role: OrgRole) -> bool {
        self.org_role >= role
    }
}

/// Generate a slug from a title: lowercase, replace non-alphanumeric with `-`,
/// collapse consecutive dashes, trim leading/trailing dashes.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    let mut result = String::new();
    let mut last_was_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !last_was_dash && !result.is_empty() {
                result.push('-');
            }
            last_was_dash = true;
        } else {
            result.push(c);
            last_was_dash = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
