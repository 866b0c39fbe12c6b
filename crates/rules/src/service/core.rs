//! Core [`RulerService`]: namespace resolution, store calls, aggregation.

use std::sync::Arc;

use tracing::debug;

use ruler_core::{NamespaceUid, SignedInUser};

use crate::aggregate::{build_group, namespace_config, org_config};
use crate::schema::{Ack, NamespaceConfig, RuleGroupConfig};
use crate::store::{MemoryStore, NamespaceResolver, RuleStore, UpdateRuleGroupCmd};

use super::error::{Result, RulerError};
use super::policy::{default_policy, UpsertPolicy};

/// Read/write operations over the namespace -> group -> rule hierarchy.
///
/// Stateless between calls: every document is built fresh from the store
/// and every operation is scoped to the caller's organization.
#[derive(Clone)]
pub struct RulerService {
    store: Arc<dyn RuleStore>,
    namespaces: Arc<dyn NamespaceResolver>,
    policy: Arc<dyn UpsertPolicy>,
}

impl RulerService {
    /// Build a service over the given collaborators with the default
    /// upsert policy (see [`default_policy`]).
    pub fn new(store: Arc<dyn RuleStore>, namespaces: Arc<dyn NamespaceResolver>) -> Self {
        Self {
            store,
            namespaces,
            policy: Arc::new(default_policy()),
        }
    }

    /// Build a service whose store also resolves namespaces.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store)
    }

    /// Replace the upsert policy.
    pub fn with_policy(mut self, policy: impl UpsertPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    fn resolve(&self, namespace: &str, user: &SignedInUser) -> Result<NamespaceUid> {
        self.namespaces
            .namespace_uid_by_slug(namespace, user.org_id, user)
            .map_err(RulerError::namespace(namespace))
    }

    /// Delete every rule in a namespace.
    pub fn delete_namespace_rules(&self, namespace: &str, user: &SignedInUser) -> Result<Ack> {
        let namespace_uid = self.resolve(namespace, user)?;
        self.store
            .delete_namespace_rules(user.org_id, &namespace_uid)
            .map_err(RulerError::store("failed to delete namespace alert rules"))?;
        Ok(Ack::new("namespace rules deleted"))
    }

    /// Delete every rule of one group.
    pub fn delete_rule_group(
        &self,
        namespace: &str,
        rule_group: &str,
        user: &SignedInUser,
    ) -> Result<Ack> {
        let namespace_uid = self.resolve(namespace, user)?;
        self.store
            .delete_group_rules(user.org_id, &namespace_uid, rule_group)
            .map_err(RulerError::store("failed to delete group alert rules"))?;
        Ok(Ack::new("rule group deleted"))
    }

    /// All groups of one namespace, keyed by the namespace as requested.
    pub fn get_namespace_rules(&self, namespace: &str, user: &SignedInUser) -> Result<NamespaceConfig> {
        let namespace_uid = self.resolve(namespace, user)?;
        let rules = self
            .store
            .list_namespace_rules(user.org_id, &namespace_uid)
            .map_err(RulerError::store("failed to get namespace alert rules"))?;
        debug!(namespace, rules = rules.len(), "aggregating namespace rules");
        Ok(namespace_config(namespace, &rules)?)
    }

    /// One group document.
    pub fn get_rule_group(
        &self,
        namespace: &str,
        rule_group: &str,
        user: &SignedInUser,
    ) -> Result<RuleGroupConfig> {
        let namespace_uid = self.resolve(namespace, user)?;
        let rules = self
            .store
            .list_group_rules(user.org_id, &namespace_uid, rule_group)
            .map_err(RulerError::store("failed to get group alert rules"))?;
        Ok(build_group(rule_group, &rules)?)
    }

    /// Every group of the caller's organization, keyed by namespace title.
    ///
    /// All-or-nothing: if any namespace title fails to resolve, no partial
    /// document is returned.
    pub fn get_org_rules(&self, user: &SignedInUser) -> Result<NamespaceConfig> {
        let rules = self
            .store
            .list_org_rules(user.org_id)
            .map_err(RulerError::store("failed to get alert rules"))?;

        org_config(&rules, |namespace_uid| {
            self.namespaces
                .namespace_title_by_uid(namespace_uid, user.org_id, user)
                .map_err(RulerError::namespace(namespace_uid))
        })
    }

    /// Create or replace the group named in `config` inside a namespace.
    pub fn upsert_rule_group(
        &self,
        namespace: &str,
        config: RuleGroupConfig,
        user: &SignedInUser,
    ) -> Result<Ack> {
        let namespace_uid = self.resolve(namespace, user)?;
        self.policy.check(user, &namespace_uid, &config)?;

        let rule_group = config.name.clone();
        self.store
            .update_rule_group(UpdateRuleGroupCmd {
                org_id: user.org_id,
                namespace_uid,
                rule_group,
                config,
            })
            .map_err(RulerError::store("failed to update rule group"))?;
        Ok(Ack::new("rule group updated successfully"))
    }
}
