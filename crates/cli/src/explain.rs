//! Human-readable listing of selection decisions.

use std::fmt::Write;

use serde_json::Value;

use seo_report_actions::{ClauseOutcome, Selection, TraceEntry};

/// Format every trace entry (or only those for `rule`) as an indented listing.
pub fn render_explanation(selection: &Selection, rule: Option<&str>) -> String {
    let mut out = String::new();
    let summary = selection.summary();
    let _ = writeln!(
        out,
        "language={} evaluated={} passed={} included={} fallback={}",
        selection.language, summary.evaluated, summary.passed, summary.included, summary.fallback
    );

    let entries = selection
        .trace
        .iter()
        .filter(|e| rule.map_or(true, |id| e.rule_id == id));
    let mut shown = 0;
    for entry in entries {
        write_entry(&mut out, entry);
        shown += 1;
    }
    if shown == 0 {
        if let Some(id) = rule {
            let _ = writeln!(out, "no trace entries for rule '{id}'");
        }
    }
    out
}

fn write_entry(out: &mut String, entry: &TraceEntry) {
    let verdict = if entry.included { "INCLUDED" } else { "skipped" };
    let _ = writeln!(
        out,
        "[{}] {} (priority {}, {}) {verdict}: {}",
        entry.phase, entry.rule_id, entry.priority, entry.severity_final, entry.justification
    );
    if !entry.title.is_empty() {
        let _ = writeln!(out, "    title: {}", entry.title);
    }
    for clause in &entry.values {
        write_clause(out, clause);
    }
}

fn write_clause(out: &mut String, clause: &ClauseOutcome) {
    let mark = if clause.passed { "pass" } else { "FAIL" };
    let field = clause.field.as_deref().unwrap_or("<no field>");
    let _ = write!(out, "    {mark} {} {field} current={}", clause.op, show(clause.current.as_ref()));
    if let Some(value) = &clause.value {
        let _ = write!(out, " value={value}");
    }
    if let Some(key) = &clause.threshold_key {
        match clause.threshold {
            Some(t) => {
                let _ = write!(out, " threshold[{key}]={t}");
            }
            None => {
                let _ = write!(out, " threshold[{key}]=<missing>");
            }
        }
    }
    out.push('\n');
}

fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "<missing>".to_string(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use seo_report_actions::{ActionSelector, Project, RuleSource};

    fn explain(rule: Option<&str>) -> String {
        let rules = RuleSource::from_yaml_str(
            r#"
limits: { min_actions: 2, max_actions: 4 }
fallback_pool: [ACT_TECH_HYGIENE]
rules:
  - id: ACT_CLICKS_DROP
    priority: 100
    severity: critical
    conditions:
      - { field: kpis.gsc.clicks_mom_pct, op: lte_neg_threshold, threshold_key: mom_drop_clicks_pct }
    title: { de: "Klickrückgang" }
  - id: ACT_CTR_LOW
    priority: 70
    severity: warning
    conditions:
      - { field: kpis.gsc.ctr, op: lt, value: 0.02 }
    title: { de: "CTR" }
  - id: ACT_TECH_HYGIENE
    priority: 1
    conditions:
      - { field: kpis.schema.errors, op: gt, value: 0 }
    title: { de: "Technik" }
"#,
        )
        .unwrap();
        let project = Project::with_thresholds([("mom_drop_clicks_pct", 0.2)]);
        let payload = json!({"kpis": {"gsc": {"clicks_mom_pct": -0.3, "ctr": 0.05}}});
        let selection = ActionSelector::new(&rules).select_for_payload(&payload, &project);
        render_explanation(&selection, rule)
    }

    #[test]
    fn lists_every_decision_with_clause_values() {
        let text = explain(None);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "language=de evaluated=3 passed=1 included=2 fallback=1");
        assert_eq!(
            lines[1],
            "[priority] ACT_CLICKS_DROP (priority 100, critical) INCLUDED: conditions met"
        );
        assert_eq!(lines[2], "    title: Klickrückgang");
        assert_eq!(
            lines[3],
            "    pass lte_neg_threshold kpis.gsc.clicks_mom_pct current=-0.3 threshold[mom_drop_clicks_pct]=0.2"
        );
        assert!(text.contains("    FAIL lt kpis.gsc.ctr current=0.05 value=0.02\n"));
        assert!(text.contains("    FAIL gt kpis.schema.errors current=<missing> value=0\n"));
        assert!(text.contains(
            "[fallback] ACT_TECH_HYGIENE (priority 1, info) INCLUDED: fallback_min_actions"
        ));
    }

    #[test]
    fn filters_by_rule_id() {
        let text = explain(Some("ACT_TECH_HYGIENE"));
        assert!(!text.contains("ACT_CLICKS_DROP"));
        assert_eq!(text.matches("ACT_TECH_HYGIENE").count(), 2);
    }

    #[test]
    fn unknown_rule_filter_says_so() {
        let text = explain(Some("ACT_NOPE"));
        assert!(text.ends_with("no trace entries for rule 'ACT_NOPE'\n"));
    }
}
