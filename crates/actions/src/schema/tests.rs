use super::*;

const RULE_FILE: &str = r#"
limits:
  min_actions: 2
  max_actions: 4
fallback_pool: [ACT_TECH_HYGIENE]
rules:
  - id: ACT_CLICKS_DROP
    priority: 90
    severity: critical
    conditions:
      - field: kpis.gsc.clicks_mom_pct
        op: lte_neg_threshold
        threshold_key: mom_drop_clicks_pct
    title:
      de: "Klicks um {{ kpis.gsc.clicks_mom_pct }} gesunken"
      en: "Clicks dropped by {{ kpis.gsc.clicks_mom_pct }}"
    reason:
      de: "Deutlicher Rückgang"
    data_refs: [kpis.gsc.clicks, kpis.gsc.clicks_mom_pct]
  - id: ACT_TECH_HYGIENE
    title:
      de: Technische Hygiene
"#;

#[test]
fn parse_full_rule_file() {
    let set: RuleSet = serde_yaml::from_str(RULE_FILE).unwrap();

    assert_eq!(set.limits, Limits::new(2, 4));
    assert_eq!(set.fallback_pool, vec!["ACT_TECH_HYGIENE"]);
    assert_eq!(set.rules.len(), 2);

    let drop = &set.rules[0];
    assert_eq!(drop.id, "ACT_CLICKS_DROP");
    assert_eq!(drop.priority, 90);
    assert_eq!(drop.severity, Severity::Critical);
    assert_eq!(drop.conditions.len(), 1);
    assert_eq!(drop.conditions[0].op, Operator::LteNegThreshold);
    assert_eq!(
        drop.conditions[0].threshold_key.as_deref(),
        Some("mom_drop_clicks_pct")
    );
    assert_eq!(drop.title.keys().collect::<Vec<_>>(), vec!["de", "en"]);
    assert_eq!(drop.data_refs.len(), 2);
}

#[test]
fn rule_defaults_fill_missing_fields() {
    let set: RuleSet = serde_yaml::from_str(RULE_FILE).unwrap();
    let hygiene = &set.rules[1];

    assert_eq!(hygiene.priority, 0);
    assert_eq!(hygiene.severity, Severity::Info);
    assert!(hygiene.conditions.is_empty());
    assert!(hygiene.reason.is_empty());
    assert!(hygiene.data_refs.is_empty());
}

#[test]
fn missing_limits_and_pool_use_defaults() {
    let set: RuleSet = serde_yaml::from_str("rules: []").unwrap();
    assert_eq!(set.limits, Limits::new(5, 8));
    assert_eq!(set.fallback_pool, DEFAULT_FALLBACK_POOL);
}

#[test]
fn unknown_operator_is_preserved() {
    let clause: ConditionClause =
        serde_yaml::from_str("field: kpis.gsc.clicks\nop: between\nvalue: 3").unwrap();
    assert_eq!(clause.op, Operator::Unknown("between".to_string()));
    assert!(!clause.op.is_known());
    assert_eq!(clause.op.to_string(), "between");
}

#[test]
fn operator_alias_key_is_accepted() {
    let clause: ConditionClause =
        serde_yaml::from_str("field: kpis.gsc.ctr\noperator: lt\nvalue: 0.02").unwrap();
    assert_eq!(clause.op, Operator::Lt);
    assert_eq!(clause.value, Some(serde_json::json!(0.02)));
}

#[test]
fn missing_operator_becomes_unknown() {
    let clause: ConditionClause = serde_yaml::from_str("field: kpis.gsc.ctr").unwrap();
    assert_eq!(clause.op, Operator::Unknown(String::new()));
}

#[test]
fn non_string_operator_becomes_unknown() {
    let cases = [
        ("op: [gt]", Operator::Unknown(r#"["gt"]"#.to_string())),
        ("op: { x: 1 }", Operator::Unknown(r#"{"x":1}"#.to_string())),
        ("op: 5", Operator::Unknown("5".to_string())),
        ("op: ~", Operator::Unknown(String::new())),
    ];
    for (op, expected) in cases {
        let clause: ConditionClause = serde_yaml::from_str(&format!("field: kpis.gsc.ctr\n{op}")).unwrap();
        assert_eq!(clause.op, expected, "{op}");
    }
}

#[test]
fn operator_serializes_as_plain_name() {
    let json = serde_json::to_value(&Operator::GtePosThreshold).unwrap();
    assert_eq!(json, serde_json::json!("gte_pos_threshold"));
    for name in Operator::KNOWN {
        assert!(Operator::from(*name).is_known(), "{name} should be known");
        assert_eq!(Operator::from(*name).as_str(), *name);
    }
}

#[test]
fn unknown_severity_is_rejected() {
    let result: Result<RuleDefinition, _> = serde_yaml::from_str("id: X\nseverity: fatal");
    assert!(result.is_err());
}

#[test]
fn limits_ignore_unknown_keys() {
    let yaml = "limits: { min_actions: 1, max: 3, max_actions: 4 }\nrules: []";
    let set: RuleSet = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(set.limits, Limits::new(1, 4));

    let document: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(unknown_limit_keys(&document), vec!["max"]);
}

#[test]
fn unknown_limit_keys_without_limits_is_empty() {
    let document: serde_yaml::Value = serde_yaml::from_str("rules: []").unwrap();
    assert!(unknown_limit_keys(&document).is_empty());
}

#[test]
fn by_priority_is_stable_for_ties() {
    let set: RuleSet = serde_yaml::from_str(
        r#"
rules:
  - { id: LOW, priority: 1 }
  - { id: TIE_A, priority: 5 }
  - { id: HIGH, priority: 10 }
  - { id: TIE_B, priority: 5 }
"#,
    )
    .unwrap();

    let ids: Vec<&str> = set.by_priority().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["HIGH", "TIE_A", "TIE_B", "LOW"]);
}

#[test]
fn duplicate_and_unresolved_ids() {
    let set: RuleSet = serde_yaml::from_str(
        r#"
fallback_pool: [A, MISSING]
rules:
  - { id: A }
  - { id: B }
  - { id: A }
  - { id: A }
"#,
    )
    .unwrap();

    assert_eq!(set.duplicate_ids(), vec!["A"]);
    assert_eq!(set.unresolved_fallback_ids(), vec!["MISSING"]);
}
