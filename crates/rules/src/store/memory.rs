//! In-memory [`RuleStore`] and [`NamespaceResolver`].

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use ruler_core::{AlertRule, Namespace, NamespaceUid, OrgId, SignedInUser, StoreError};

use crate::schema::RuleInterval;
use crate::translate::from_rule_node;

use super::seed::Seed;
use super::{NamespaceResolver, RuleStore, StoreResult, UpdateRuleGroupCmd};

/// Thread-safe in-memory rule and namespace store.
///
/// Rules are kept in insertion order so queries return rows the way a
/// relational store would without an `ORDER BY`. Uses `std::sync::RwLock`
/// so it can be called from both async handlers and plain threads.
#[derive(Default)]
pub struct MemoryStore {
    namespaces: RwLock<Vec<Namespace>>,
    rules: RwLock<Vec<AlertRule>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Storage("store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a seed document.
    ///
    /// Every seeded rule must point at a seeded namespace of its own
    /// organization.
    pub fn from_seed(seed: Seed) -> StoreResult<Self> {
        let store = Self::new();
        for ns in seed.namespaces {
            store.add_namespace(ns.into_namespace())?;
        }
        let rule_count = seed.rules.len();
        for rule in seed.rules {
            store.insert_rule(rule)?;
        }
        info!(
            namespaces = store.read_namespaces()?.len(),
            rules = rule_count,
            "seeded rule store"
        );
        Ok(store)
    }

    fn read_namespaces(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Namespace>>> {
        self.namespaces.read().map_err(poisoned)
    }

    fn read_rules(&self) -> StoreResult<RwLockReadGuard<'_, Vec<AlertRule>>> {
        self.rules.read().map_err(poisoned)
    }

    fn write_rules(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<AlertRule>>> {
        self.rules.write().map_err(poisoned)
    }

    /// Register a namespace. UIDs and slugs are unique per organization.
    pub fn add_namespace(&self, namespace: Namespace) -> StoreResult<()> {
        let mut guard = self.namespaces.write().map_err(poisoned)?;
        if guard.iter().any(|ns| {
            ns.org_id == namespace.org_id && (ns.uid == namespace.uid || ns.slug == namespace.slug)
        }) {
            return Err(StoreError::Conflict(format!(
                "namespace '{}' ({}) already exists in org {}",
                namespace.slug, namespace.uid, namespace.org_id
            )));
        }
        guard.push(namespace);
        Ok(())
    }

    /// Append one rule row. The namespace must exist in the rule's org, the
    /// UID must be unused within that org and the interval must be
    /// representable as group interval text.
    pub fn insert_rule(&self, rule: AlertRule) -> StoreResult<()> {
        if rule.interval_seconds > RuleInterval::MAX_SECS {
            return Err(StoreError::InvalidRule(format!(
                "rule '{}' interval of {}s exceeds the maximum of {}s",
                rule.uid,
                rule.interval_seconds,
                RuleInterval::MAX_SECS
            )));
        }
        self.ensure_namespace(rule.org_id, &rule.namespace_uid)?;
        let mut guard = self.write_rules()?;
        if guard.iter().any(|r| r.org_id == rule.org_id && r.uid == rule.uid) {
            return Err(StoreError::Conflict(format!(
                "rule '{}' already exists in org {}",
                rule.uid, rule.org_id
            )));
        }
        guard.push(rule);
        Ok(())
    }

    /// Snapshot of all namespaces in an organization.
    pub fn namespaces(&self, org_id: OrgId) -> StoreResult<Vec<Namespace>> {
        Ok(self
            .read_namespaces()?
            .iter()
            .filter(|ns| ns.org_id == org_id)
            .cloned()
            .collect())
    }

    fn ensure_namespace(&self, org_id: OrgId, namespace_uid: &str) -> StoreResult<()> {
        let found = self
            .read_namespaces()?
            .iter()
            .any(|ns| ns.org_id == org_id && ns.uid == namespace_uid);
        if found {
            Ok(())
        } else {
            Err(StoreError::NamespaceNotFound(namespace_uid.to_string()))
        }
    }

    fn filtered<F>(&self, keep: F) -> StoreResult<Vec<AlertRule>>
    where
        F: Fn(&AlertRule) -> bool,
    {
        Ok(self.read_rules()?.iter().filter(|r| keep(r)).cloned().collect())
    }

    fn remove<F>(&self, matches: F) -> StoreResult<usize>
    where
        F: Fn(&AlertRule) -> bool,
    {
        let mut guard = self.write_rules()?;
        let before = guard.len();
        guard.retain(|r| !matches(r));
        Ok(before - guard.len())
    }
}

impl NamespaceResolver for MemoryStore {
    fn namespace_uid_by_slug(
        &self,
        slug: &str,
        org_id: OrgId,
        user: &SignedInUser,
    ) -> StoreResult<NamespaceUid> {
        debug!(slug, org_id, user = %user.login, "resolving namespace slug");
        self.read_namespaces()?
            .iter()
            .find(|ns| ns.org_id == org_id && ns.slug == slug)
            .map(|ns| ns.uid.clone())
            .ok_or_else(|| StoreError::NamespaceNotFound(slug.to_string()))
    }

    fn namespace_title_by_uid(
        &self,
        namespace_uid: &str,
        org_id: OrgId,
        user: &SignedInUser,
    ) -> StoreResult<String> {
        debug!(namespace_uid, org_id, user = %user.login, "resolving namespace title");
        self.read_namespaces()?
            .iter()
            .find(|ns| ns.org_id == org_id && ns.uid == namespace_uid)
            .map(|ns| ns.title.clone())
            .ok_or_else(|| StoreError::NamespaceNotFound(namespace_uid.to_string()))
    }
}

impl RuleStore for MemoryStore {
    fn delete_namespace_rules(&self, org_id: OrgId, namespace_uid: &str) -> StoreResult<usize> {
        let removed = self.remove(|r| r.org_id == org_id && r.namespace_uid == namespace_uid)?;
        info!(org_id, namespace_uid, removed, "deleted namespace rules");
        Ok(removed)
    }

    fn delete_group_rules(
        &self,
        org_id: OrgId,
        namespace_uid: &str,
        rule_group: &str,
    ) -> StoreResult<usize> {
        let removed = self.remove(|r| r.in_group(org_id, namespace_uid, rule_group))?;
        info!(org_id, namespace_uid, rule_group, removed, "deleted rule group");
        Ok(removed)
    }

    fn list_namespace_rules(&self, org_id: OrgId, namespace_uid: &str) -> StoreResult<Vec<AlertRule>> {
        self.filtered(|r| r.org_id == org_id && r.namespace_uid == namespace_uid)
    }

    fn list_group_rules(
        &self,
        org_id: OrgId,
        namespace_uid: &str,
        rule_group: &str,
    ) -> StoreResult<Vec<AlertRule>> {
        self.filtered(|r| r.in_group(org_id, namespace_uid, rule_group))
    }

    fn list_org_rules(&self, org_id: OrgId) -> StoreResult<Vec<AlertRule>> {
        self.filtered(|r| r.org_id == org_id)
    }

    /// Replace the group's rule set with the payload.
    ///
    /// Payload rules whose UID already exists in the org are updated (and
    /// moved into this group if they lived elsewhere), rules with an empty
    /// UID are created, and previous members missing from the payload are
    /// deleted. Members end up in payload order with the group's interval.
    /// A UID held only by other organizations cannot be claimed.
    fn update_rule_group(&self, cmd: UpdateRuleGroupCmd) -> StoreResult<()> {
        let UpdateRuleGroupCmd {
            org_id,
            namespace_uid,
            rule_group,
            config,
        } = cmd;
        self.ensure_namespace(org_id, &namespace_uid)?;

        let mut incoming: Vec<AlertRule> = Vec::with_capacity(config.rules.len());
        let mut payload_uids: HashSet<String> = HashSet::new();
        for node in &config.rules {
            let mut rule = from_rule_node(node, org_id, &namespace_uid, &rule_group, config.interval);
            if rule.uid.is_empty() {
                rule.uid = uuid::Uuid::new_v4().to_string();
            }
            if !payload_uids.insert(rule.uid.clone()) {
                return Err(StoreError::Conflict(format!(
                    "rule '{}' appears more than once in group '{}'",
                    rule.uid, rule_group
                )));
            }
            incoming.push(rule);
        }

        let mut guard = self.write_rules()?;
        let claimed = incoming.iter().find(|rule| {
            let owned_here = guard.iter().any(|r| r.org_id == org_id && r.uid == rule.uid);
            !owned_here && guard.iter().any(|r| r.org_id != org_id && r.uid == rule.uid)
        });
        if let Some(rule) = claimed {
            return Err(StoreError::Conflict(format!(
                "rule '{}' belongs to another organization",
                rule.uid
            )));
        }

        let previous: HashMap<String, i64> = guard
            .iter()
            .filter(|r| {
                r.org_id == org_id
                    && (payload_uids.contains(&r.uid) || r.in_group(org_id, &namespace_uid, &rule_group))
            })
            .map(|r| (r.uid.clone(), r.version))
            .collect();

        guard.retain(|r| !previous.contains_key(&r.uid) || r.org_id != org_id);

        let mut created = 0usize;
        for mut rule in incoming {
            rule.version = match previous.get(&rule.uid) {
                Some(v) => v + 1,
                None => {
                    created += 1;
                    1
                }
            };
            guard.push(rule);
        }

        let deleted = previous.keys().filter(|uid| !payload_uids.contains(*uid)).count();
        info!(
            org_id,
            namespace_uid = %namespace_uid,
            rule_group = %rule_group,
            rules = config.rules.len(),
            created,
            deleted,
            "updated rule group"
        );
        Ok(())
    }
}
