//! Tests for the in-memory store and seed loading.

use std::fs;

use ruler_core::{NoDataState, OrgRole, SignedInUser, StoreError};
use tempfile::TempDir;

use super::*;
use crate::schema::{RuleGroupConfig, RuleInterval};
use crate::translate::to_rule_node;

const SEED_YAML: &str = r#"
namespaces:
  - uid: ns1
    title: Production
    org_id: 1
  - uid: ns2
    title: Staging
    org_id: 1
  - uid: ns-other
    title: Production
    org_id: 2
rules:
  - uid: r1
    org_id: 1
    namespace_uid: ns1
    rule_group: g1
    title: High CPU
    condition: B
    interval_seconds: 60
    no_data_state: OK
  - uid: r2
    org_id: 1
    namespace_uid: ns1
    rule_group: g1
    title: High memory
    condition: B
    interval_seconds: 60
  - uid: r3
    org_id: 1
    namespace_uid: ns1
    rule_group: g2
    title: Disk
    condition: A
    interval_seconds: 300
  - uid: r4
    org_id: 1
    namespace_uid: ns2
    rule_group: g1
    title: Staging CPU
    condition: B
    interval_seconds: 60
  - uid: r1
    org_id: 2
    namespace_uid: ns-other
    rule_group: g1
    title: Other org CPU
    condition: B
    interval_seconds: 60
"#;

fn seeded() -> MemoryStore {
    MemoryStore::from_seed(Seed::from_yaml(SEED_YAML).unwrap()).unwrap()
}

fn viewer(org_id: i64) -> SignedInUser {
    SignedInUser::new(1, org_id, "viewer", OrgRole::Viewer)
}

fn uids(rules: &[ruler_core::AlertRule]) -> Vec<&str> {
    rules.iter().map(|r| r.uid.as_str()).collect()
}

#[test]
fn seed_applies_defaults() {
    let store = seeded();
    let rules = store.list_group_rules(1, "ns1", "g1").unwrap();
    assert_eq!(uids(&rules), vec!["r1", "r2"]);
    assert_eq!(rules[0].no_data_state, NoDataState::Ok);
    assert_eq!(rules[1].no_data_state, NoDataState::NoData);

    let namespaces = store.namespaces(1).unwrap();
    assert_eq!(namespaces.len(), 2);
    assert_eq!(namespaces[0].slug, "production");
}

#[test]
fn seed_rejects_rule_in_unknown_namespace() {
    let seed = Seed::from_yaml(
        r#"
rules:
  - uid: r1
    org_id: 1
    namespace_uid: nowhere
    rule_group: g1
    title: t
    condition: A
    interval_seconds: 10
"#,
    )
    .unwrap();
    assert!(matches!(
        MemoryStore::from_seed(seed),
        Err(StoreError::NamespaceNotFound(ref uid)) if uid == "nowhere"
    ));
}

#[test]
fn load_seed_file_from_disk() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("seed.yml");
    fs::write(&path, SEED_YAML).unwrap();

    let seed = load_seed_file(&path).unwrap();
    assert_eq!(seed.namespaces.len(), 3);
    assert_eq!(seed.rules.len(), 5);

    assert!(matches!(
        load_seed_file(&dir.path().join("missing.yml")),
        Err(StoreError::Io(_))
    ));
}

#[test]
fn seed_file_with_bad_yaml_is_serialization_error() {
    assert!(matches!(
        Seed::from_yaml("namespaces: [this is: not valid"),
        Err(StoreError::Serialize(_))
    ));
}

#[test]
fn slug_resolution_is_org_scoped() {
    let store = seeded();
    assert_eq!(store.namespace_uid_by_slug("production", 1, &viewer(1)).unwrap(), "ns1");
    assert_eq!(
        store.namespace_uid_by_slug("production", 2, &viewer(2)).unwrap(),
        "ns-other"
    );
    assert!(store
        .namespace_uid_by_slug("staging", 2, &viewer(2))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn title_resolution_is_org_scoped() {
    let store = seeded();
    assert_eq!(store.namespace_title_by_uid("ns2", 1, &viewer(1)).unwrap(), "Staging");
    assert!(store.namespace_title_by_uid("ns2", 2, &viewer(2)).is_err());
}

#[test]
fn duplicate_namespace_slug_conflicts() {
    let store = seeded();
    let err = store
        .add_namespace(ruler_core::Namespace::new("ns9", "Production", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    // Same slug in another org is fine.
    store
        .add_namespace(ruler_core::Namespace::new("ns9", "Staging", 2))
        .unwrap();
}

#[test]
fn org_query_never_crosses_orgs() {
    let store = seeded();
    assert_eq!(uids(&store.list_org_rules(1).unwrap()), vec!["r1", "r2", "r3", "r4"]);
    let other = store.list_org_rules(2).unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].title, "Other org CPU");
}

#[test]
fn delete_group_only_touches_exact_triple() {
    let store = seeded();
    assert_eq!(store.delete_group_rules(1, "ns1", "g1").unwrap(), 2);

    assert!(store.list_group_rules(1, "ns1", "g1").unwrap().is_empty());
    assert_eq!(uids(&store.list_group_rules(1, "ns1", "g2").unwrap()), vec!["r3"]);
    assert_eq!(uids(&store.list_group_rules(1, "ns2", "g1").unwrap()), vec!["r4"]);
    assert_eq!(store.list_group_rules(2, "ns-other", "g1").unwrap().len(), 1);
}

#[test]
fn delete_namespace_keeps_other_namespaces() {
    let store = seeded();
    assert_eq!(store.delete_namespace_rules(1, "ns1").unwrap(), 3);
    assert!(store.list_namespace_rules(1, "ns1").unwrap().is_empty());
    assert_eq!(store.list_org_rules(1).unwrap().len(), 1);
    assert_eq!(store.list_org_rules(2).unwrap().len(), 1);
}

#[test]
fn update_rule_group_replaces_members() {
    let store = seeded();
    let existing = store.list_group_rules(1, "ns1", "g1").unwrap();

    // Keep r2 (edited), drop r1, add a new rule without a UID.
    let mut kept = to_rule_node(&existing[1]);
    kept.grafana_alert.title = "High memory (edited)".to_string();
    let mut fresh = to_rule_node(&existing[0]);
    fresh.grafana_alert.uid = String::new();
    fresh.grafana_alert.title = "New rule".to_string();

    let mut config = RuleGroupConfig::new("g1", RuleInterval::from_secs(30));
    config.rules = vec![fresh, kept];

    store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 1,
            namespace_uid: "ns1".to_string(),
            rule_group: "g1".to_string(),
            config,
        })
        .unwrap();

    let rules = store.list_group_rules(1, "ns1", "g1").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].title, "New rule");
    assert!(!rules[0].uid.is_empty());
    assert_eq!(rules[0].version, 1);
    assert_eq!(rules[1].uid, "r2");
    assert_eq!(rules[1].title, "High memory (edited)");
    assert_eq!(rules[1].version, existing[1].version + 1);
    assert!(rules.iter().all(|r| r.interval_seconds == 30));

    // Other groups and orgs untouched.
    assert_eq!(uids(&store.list_group_rules(1, "ns1", "g2").unwrap()), vec!["r3"]);
    assert_eq!(store.list_org_rules(2).unwrap()[0].uid, "r1");
}

#[test]
fn update_rule_group_moves_rule_between_groups() {
    let store = seeded();
    let r3 = store.list_group_rules(1, "ns1", "g2").unwrap().remove(0);

    let mut config = RuleGroupConfig::new("g3", RuleInterval::from_secs(300));
    config.rules = vec![to_rule_node(&r3)];
    store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 1,
            namespace_uid: "ns2".to_string(),
            rule_group: "g3".to_string(),
            config,
        })
        .unwrap();

    assert!(store.list_group_rules(1, "ns1", "g2").unwrap().is_empty());
    let moved = store.list_group_rules(1, "ns2", "g3").unwrap();
    assert_eq!(uids(&moved), vec!["r3"]);
    assert_eq!(moved[0].namespace_uid, "ns2");
}

#[test]
fn update_rule_group_rejects_duplicate_uids_and_unknown_namespace() {
    let store = seeded();
    let r1 = store.list_group_rules(1, "ns1", "g1").unwrap().remove(0);

    let mut config = RuleGroupConfig::new("g1", RuleInterval::from_secs(60));
    config.rules = vec![to_rule_node(&r1), to_rule_node(&r1)];
    let err = store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 1,
            namespace_uid: "ns1".to_string(),
            rule_group: "g1".to_string(),
            config: config.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    // Nothing changed.
    assert_eq!(store.list_group_rules(1, "ns1", "g1").unwrap().len(), 2);

    let err = store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 2,
            namespace_uid: "ns1".to_string(),
            rule_group: "g1".to_string(),
            config,
        })
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn bundled_sample_seed_loads() {
    let seed = Seed::from_yaml(include_str!("../../../../data/seed.yml")).unwrap();
    let store = MemoryStore::from_seed(seed).unwrap();
    let user = viewer(1);

    let uid = store.namespace_uid_by_slug("web-frontend", 1, &user).unwrap();
    let rules = store.list_namespace_rules(1, &uid).unwrap();
    assert_eq!(uids(&rules), vec!["web-5xx", "web-latency"]);
    assert_eq!(store.namespaces(1).unwrap().len(), 2);
}

#[test]
fn update_rule_group_cannot_claim_another_orgs_uid() {
    let store = seeded();
    let r3 = store.list_group_rules(1, "ns1", "g2").unwrap().remove(0);

    let mut config = RuleGroupConfig::new("g9", RuleInterval::from_secs(60));
    config.rules = vec![to_rule_node(&r3)];
    let err = store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 2,
            namespace_uid: "ns-other".to_string(),
            rule_group: "g9".to_string(),
            config,
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    assert_eq!(uids(&store.list_org_rules(2).unwrap()), vec!["r1"]);
    assert_eq!(uids(&store.list_group_rules(1, "ns1", "g2").unwrap()), vec!["r3"]);
}

#[test]
fn update_rule_group_keeps_uid_shared_by_both_orgs() {
    let store = seeded();
    let own_r1 = store.list_org_rules(2).unwrap().remove(0);

    let mut config = RuleGroupConfig::new("g1", RuleInterval::from_secs(120));
    config.rules = vec![to_rule_node(&own_r1)];
    store
        .update_rule_group(UpdateRuleGroupCmd {
            org_id: 2,
            namespace_uid: "ns-other".to_string(),
            rule_group: "g1".to_string(),
            config,
        })
        .unwrap();

    let org2 = store.list_org_rules(2).unwrap();
    assert_eq!(uids(&org2), vec!["r1"]);
    assert_eq!(org2[0].interval_seconds, 120);
    let org1_r1 = store.list_group_rules(1, "ns1", "g1").unwrap().remove(0);
    assert_eq!(org1_r1.uid, "r1");
    assert_eq!(org1_r1.interval_seconds, 60);
}

#[test]
fn insert_rule_bounds_the_interval() {
    let store = seeded();
    let mut rule = store.list_group_rules(1, "ns1", "g2").unwrap().remove(0);

    rule.uid = "too-slow".to_string();
    rule.interval_seconds = RuleInterval::MAX_SECS + 1;
    let err = store.insert_rule(rule.clone()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidRule(_)));

    rule.uid = "slowest".to_string();
    rule.interval_seconds = RuleInterval::MAX_SECS;
    rule.rule_group = "slow".to_string();
    store.insert_rule(rule).unwrap();
    let slow = store.list_group_rules(1, "ns1", "slow").unwrap();
    assert_eq!(uids(&slow), vec!["slowest"]);
}

#[test]
fn seed_with_unrepresentable_interval_is_rejected() {
    let yaml = format!(
        "namespaces:\n  - uid: ns1\n    title: Production\n    org_id: 1\nrules:\n  - uid: r1\n    org_id: 1\n    namespace_uid: ns1\n    rule_group: g1\n    title: Slow\n    condition: A\n    interval_seconds: {}\n",
        u64::MAX / 100
    );
    let err = MemoryStore::from_seed(Seed::from_yaml(&yaml).unwrap()).err().unwrap();
    assert!(matches!(err, StoreError::InvalidRule(_)));
}
