//! Pluggable checks run before a rule group upsert reaches the store.

use std::collections::HashSet;
use std::sync::Arc;

use ruler_core::{OrgRole, SignedInUser};

use crate::schema::RuleGroupConfig;

/// Why an upsert was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    /// The payload itself is malformed.
    #[error("invalid rule group: {0}")]
    Invalid(String),

    /// The caller may not perform the write.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// A capability check the service calls after resolving the namespace and
/// before delegating the upsert to the store.
pub trait UpsertPolicy: Send + Sync {
    fn check(
        &self,
        user: &SignedInUser,
        namespace_uid: &str,
        group: &RuleGroupConfig,
    ) -> Result<(), PolicyViolation>;
}

/// Accepts everything. Stand-in for permission and quota checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl UpsertPolicy for AllowAll {
    fn check(&self, _: &SignedInUser, _: &str, _: &RuleGroupConfig) -> Result<(), PolicyViolation> {
        Ok(())
    }
}

/// Rejects a payload with no group name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyGroupName;

impl UpsertPolicy for NonEmptyGroupName {
    fn check(&self, _: &SignedInUser, _: &str, group: &RuleGroupConfig) -> Result<(), PolicyViolation> {
        if group.name.trim().is_empty() {
            return Err(PolicyViolation::Invalid("rule group name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Rejects a payload in which two rules carry the same non-empty UID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueRuleUids;

impl UpsertPolicy for UniqueRuleUids {
    fn check(&self, _: &SignedInUser, _: &str, group: &RuleGroupConfig) -> Result<(), PolicyViolation> {
        let mut seen = HashSet::new();
        for uid in group.rule_uids() {
            if !seen.insert(uid) {
                return Err(PolicyViolation::Invalid(format!(
                    "rule uid '{}' is used more than once in group '{}'",
                    uid, group.name
                )));
            }
        }
        Ok(())
    }
}

/// Rejects intervals with a sub-second part. Rules store whole seconds, so
/// `1500ms` would otherwise read back as `1s`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeSecondInterval;

impl UpsertPolicy for WholeSecondInterval {
    fn check(&self, _: &SignedInUser, _: &str, group: &RuleGroupConfig) -> Result<(), PolicyViolation> {
        if group.interval.as_duration().subsec_nanos() != 0 {
            return Err(PolicyViolation::Invalid(format!(
                "interval {} of group '{}' must be a whole number of seconds",
                group.interval, group.name
            )));
        }
        Ok(())
    }
}

/// Requires the caller to hold at least the given org role.
#[derive(Debug, Clone, Copy)]
pub struct RequireRole(pub OrgRole);

impl UpsertPolicy for RequireRole {
    fn check(&self, user: &SignedInUser, _: &str, _: &RuleGroupConfig) -> Result<(), PolicyViolation> {
        if user.has_role(self.0) {
            Ok(())
        } else {
            Err(PolicyViolation::Forbidden(format!(
                "user '{}' needs role {} to edit rules (has {})",
                user.login, self.0, user.org_role
            )))
        }
    }
}

/// Runs several policies in order; the first violation wins.
#[derive(Clone, Default)]
pub struct PolicyChain {
    policies: Vec<Arc<dyn UpsertPolicy>>,
}

impl PolicyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, policy: impl UpsertPolicy + 'static) -> Self {
        self.policies.push(Arc::new(policy));
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl UpsertPolicy for PolicyChain {
    fn check(
        &self,
        user: &SignedInUser,
        namespace_uid: &str,
        group: &RuleGroupConfig,
    ) -> Result<(), PolicyViolation> {
        for policy in &self.policies {
            policy.check(user, namespace_uid, group)?;
        }
        Ok(())
    }
}

/// The checks applied when a service is built without an explicit policy.
pub fn default_policy() -> PolicyChain {
    PolicyChain::new()
        .with(NonEmptyGroupName)
        .with(WholeSecondInterval)
        .with(UniqueRuleUids)
}
