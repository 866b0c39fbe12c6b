//! Tests for the aggregation module.

use std::cell::RefCell;
use std::collections::BTreeSet;

use chrono::Utc;
use ruler_core::{AlertRule, ExecutionErrorState, NoDataState};
use serde_json::json;

use super::*;

fn make_rule(uid: &str, namespace_uid: &str, group: &str, interval_seconds: u64) -> AlertRule {
    AlertRule {
        uid: uid.to_string(),
        org_id: 1,
        namespace_uid: namespace_uid.to_string(),
        rule_group: group.to_string(),
        title: format!("Rule {}", uid),
        condition: "A".to_string(),
        data: json!([]),
        interval_seconds,
        no_data_state: NoDataState::NoData,
        exec_err_state: ExecutionErrorState::Alerting,
        updated: Utc::now(),
        version: 1,
    }
}

fn uids(group: &crate::schema::RuleGroupConfig) -> Vec<&str> {
    group.rules.iter().map(|r| r.uid()).collect()
}

/// Error type for closures that can fail on lookup as well as aggregation.
#[derive(Debug, PartialEq)]
enum LookupError {
    Missing(String),
    Aggregate(AggregateError),
}

impl From<AggregateError> for LookupError {
    fn from(e: AggregateError) -> Self {
        LookupError::Aggregate(e)
    }
}

// -- build_group -------------------------------------------------------

#[test]
fn build_group_preserves_length_and_order() {
    let rules = vec![
        make_rule("c", "ns1", "g1", 60),
        make_rule("a", "ns1", "g1", 60),
        make_rule("b", "ns1", "g1", 60),
    ];

    let group = build_group("g1", &rules).unwrap();
    assert_eq!(group.name, "g1");
    assert_eq!(group.interval.as_secs(), 60);
    assert_eq!(uids(&group), vec!["c", "a", "b"]);
}

#[test]
fn build_group_empty_input() {
    let group = build_group("missing", &[]).unwrap();
    assert_eq!(group.name, "missing");
    assert_eq!(group.interval.as_secs(), 0);
    assert!(group.rules.is_empty());
}

#[test]
fn build_group_rejects_mixed_intervals() {
    let rules = vec![make_rule("a", "ns1", "g1", 60), make_rule("b", "ns1", "g1", 30)];

    let err = build_group("g1", &rules).unwrap_err();
    match err {
        AggregateError::IntervalMismatch { group, rule_uid, expected, found } => {
            assert_eq!(group, "g1");
            assert_eq!(rule_uid, "b");
            assert_eq!(expected.as_secs(), 60);
            assert_eq!(found.as_secs(), 30);
        }
    }
}

#[test]
fn build_group_is_deterministic() {
    let rules = vec![make_rule("a", "ns1", "g1", 60), make_rule("b", "ns1", "g1", 60)];
    assert_eq!(build_group("g1", &rules).unwrap(), build_group("g1", &rules).unwrap());
}

// -- group_rules -------------------------------------------------------

#[test]
fn group_rules_three_and_one() {
    let rules = vec![
        make_rule("r1", "ns1", "g1", 60),
        make_rule("r2", "ns1", "g2", 10),
        make_rule("r3", "ns1", "g1", 60),
        make_rule("r4", "ns1", "g1", 60),
    ];

    let groups = group_rules(&rules).unwrap();
    assert_eq!(groups.len(), 2);

    let g1 = groups.iter().find(|g| g.name == "g1").unwrap();
    let g2 = groups.iter().find(|g| g.name == "g2").unwrap();
    assert_eq!(uids(g1), vec!["r1", "r3", "r4"]);
    assert_eq!(uids(g2), vec!["r2"]);
    assert_eq!(g2.interval.as_secs(), 10);
}

#[test]
fn group_rules_partitions_every_input_rule() {
    let rules = vec![
        make_rule("r1", "ns1", "b", 60),
        make_rule("r2", "ns1", "a", 60),
        make_rule("r3", "ns1", "c", 60),
        make_rule("r4", "ns1", "a", 60),
        make_rule("r5", "ns1", "b", 60),
    ];

    let groups = group_rules(&rules).unwrap();

    let mut seen = BTreeSet::new();
    for group in &groups {
        for node in &group.rules {
            let original = rules.iter().find(|r| r.uid == node.uid()).unwrap();
            assert_eq!(original.rule_group, group.name);
            seen.insert(node.uid().to_string());
        }
    }
    let input: BTreeSet<String> = rules.iter().map(|r| r.uid.clone()).collect();
    assert_eq!(seen, input);

    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn group_rules_rejects_mixed_intervals_in_one_group() {
    let rules = vec![
        make_rule("r1", "ns1", "g1", 60),
        make_rule("r2", "ns1", "g2", 30),
        make_rule("r3", "ns1", "g1", 120),
    ];
    assert!(matches!(
        group_rules(&rules),
        Err(AggregateError::IntervalMismatch { ref group, .. }) if group == "g1"
    ));
}

#[test]
fn namespace_config_single_key() {
    let rules = vec![make_rule("r1", "ns1", "g1", 60), make_rule("r2", "ns1", "g2", 60)];

    let config = namespace_config("production", &rules).unwrap();
    assert_eq!(config.len(), 1);
    assert_eq!(config["production"].len(), 2);

    assert!(namespace_config("production", &[]).unwrap().is_empty());
}

// -- org_config --------------------------------------------------------

#[test]
fn org_config_keys_by_display_name() {
    let rules = vec![
        make_rule("r1", "ns1", "g1", 60),
        make_rule("r2", "ns2", "g1", 30),
        make_rule("r3", "ns1", "g2", 60),
        make_rule("r4", "ns1", "g1", 60),
    ];

    let config = org_config(&rules, |uid| -> Result<String> {
        Ok(match uid {
            "ns1" => "Production".to_string(),
            _ => "Staging".to_string(),
        })
    })
    .unwrap();

    let keys: Vec<&str> = config.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["Production", "Staging"]);

    let prod = &config["Production"];
    assert_eq!(prod.len(), 2);
    assert_eq!(uids(&prod[0]), vec!["r1", "r4"]);
    assert_eq!(uids(&prod[1]), vec!["r3"]);

    let staging = &config["Staging"];
    assert_eq!(staging.len(), 1);
    assert_eq!(staging[0].interval.as_secs(), 30);
}

#[test]
fn org_config_resolves_each_namespace_once() {
    let rules = vec![
        make_rule("r1", "ns1", "g1", 60),
        make_rule("r2", "ns1", "g1", 60),
        make_rule("r3", "ns2", "g1", 60),
        make_rule("r4", "ns1", "g2", 60),
    ];
    let calls = RefCell::new(Vec::new());

    org_config(&rules, |uid| -> Result<String> {
        calls.borrow_mut().push(uid.to_string());
        Ok(uid.to_uppercase())
    })
    .unwrap();

    assert_eq!(calls.into_inner(), vec!["ns1", "ns2"]);
}

#[test]
fn org_config_aborts_on_first_lookup_failure() {
    let rules = vec![
        make_rule("r1", "ns1", "g1", 60),
        make_rule("r2", "gone", "g1", 60),
        make_rule("r3", "ns3", "g1", 60),
    ];
    let calls = RefCell::new(0);

    let err = org_config(&rules, |uid| {
        *calls.borrow_mut() += 1;
        if uid == "gone" {
            Err(LookupError::Missing(uid.to_string()))
        } else {
            Ok(uid.to_string())
        }
    })
    .unwrap_err();

    assert_eq!(err, LookupError::Missing("gone".to_string()));
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn org_config_does_not_merge_namespaces_sharing_a_title() {
    let rules = vec![make_rule("r1", "ns1", "g1", 60), make_rule("r2", "ns2", "g1", 30)];

    let config = org_config(&rules, |_| -> std::result::Result<String, LookupError> {
        Ok("Shared".to_string())
    })
    .unwrap();

    let shared = &config["Shared"];
    assert_eq!(shared.len(), 2);
    assert!(shared.iter().all(|g| g.name == "g1" && g.rules.len() == 1));
}

#[test]
fn org_config_surfaces_interval_mismatch() {
    let rules = vec![make_rule("r1", "ns1", "g1", 60), make_rule("r2", "ns1", "g1", 10)];

    let err = org_config(&rules, |uid| -> std::result::Result<String, LookupError> {
        Ok(uid.to_string())
    })
    .unwrap_err();
    assert!(matches!(err, LookupError::Aggregate(AggregateError::IntervalMismatch { .. })));
}
