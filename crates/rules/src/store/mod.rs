//! Collaborator contracts for rule persistence and namespace lookup.
//!
//! The ruler never persists state itself. It talks to a [`RuleStore`] for
//! rule rows and a [`NamespaceResolver`] for slug/UID/title lookups. Both
//! are synchronous and `Send + Sync` so they can be shared across request
//! handlers behind an `Arc`.
//!
//! [`MemoryStore`] implements both and can be seeded from a YAML file.

mod memory;
mod seed;

#[cfg(test)]
mod tests;

use ruler_core::{AlertRule, NamespaceUid, OrgId, SignedInUser, StoreError};

use crate::schema::RuleGroupConfig;

pub use self::memory::MemoryStore;
pub use self::seed::{load_seed_file, Seed, SeedNamespace};

/// Result alias for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maps human-facing namespace identifiers to durable ones and back.
///
/// Both lookups are scoped to one organization; a slug or UID that exists
/// only in another organization must fail with
/// [`StoreError::NamespaceNotFound`].
pub trait NamespaceResolver: Send + Sync {
    /// Resolve a namespace slug to its UID.
    fn namespace_uid_by_slug(
        &self,
        slug: &str,
        org_id: OrgId,
        user: &SignedInUser,
    ) -> StoreResult<NamespaceUid>;

    /// Resolve a namespace UID to its display name.
    fn namespace_title_by_uid(
        &self,
        namespace_uid: &str,
        org_id: OrgId,
        user: &SignedInUser,
    ) -> StoreResult<String>;
}

/// Group-level replace command handed to [`RuleStore::update_rule_group`].
#[derive(Debug, Clone)]
pub struct UpdateRuleGroupCmd {
    pub org_id: OrgId,
    pub namespace_uid: NamespaceUid,
    pub rule_group: String,
    pub config: RuleGroupConfig,
}

/// Durable storage of alert rule rows.
///
/// Every call is pre-filtered by organization. Queries return rows in store
/// insertion order.
pub trait RuleStore: Send + Sync {
    /// Delete every rule in a namespace. Returns the number of rows removed.
    fn delete_namespace_rules(&self, org_id: OrgId, namespace_uid: &str) -> StoreResult<usize>;

    /// Delete every rule of one group. Returns the number of rows removed.
    fn delete_group_rules(
        &self,
        org_id: OrgId,
        namespace_uid: &str,
        rule_group: &str,
    ) -> StoreResult<usize>;

    fn list_namespace_rules(&self, org_id: OrgId, namespace_uid: &str) -> StoreResult<Vec<AlertRule>>;

    fn list_group_rules(
        &self,
        org_id: OrgId,
        namespace_uid: &str,
        rule_group: &str,
    ) -> StoreResult<Vec<AlertRule>>;

    fn list_org_rules(&self, org_id: OrgId) -> StoreResult<Vec<AlertRule>>;

    /// Create or replace a whole rule group.
    fn update_rule_group(&self, cmd: UpdateRuleGroupCmd) -> StoreResult<()>;
}
