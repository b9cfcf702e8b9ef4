use serde_json::json;

use super::*;

fn sample_payload() -> Value {
    json!({
        "meta": {"client_name": "Acme", "report_language": "de"},
        "kpis": {
            "gsc": {"clicks": 100, "clicks_mom_pct": -0.2512, "ctr": 0.25, "impressions_mom_pct": null}
        }
    })
}

fn rule_with_title(pairs: &[(&str, &str)]) -> RuleDefinition {
    let mut yaml = String::from("id: ACT_TEST\ntitle:\n");
    for (lang, tpl) in pairs {
        yaml.push_str(&format!("  {lang}: \"{tpl}\"\n"));
    }
    serde_yaml::from_str(&yaml).unwrap()
}

#[test]
fn interpolates_payload_values() {
    let renderer = ActionRenderer::default();
    let out = renderer
        .render_template("{{ meta.client_name }}: {{ kpis.gsc.clicks }} clicks, CTR {{ kpis.gsc.ctr }}", &sample_payload())
        .unwrap();
    assert_eq!(out, "Acme: 100 clicks, CTR 0.25");
}

#[test]
fn missing_variable_renders_empty() {
    let renderer = ActionRenderer::default();
    let out = renderer
        .render_template("INP: [{{ kpis.cwv.inp_p75 }}] [{{ nothing.at.all }}]", &sample_payload())
        .unwrap();
    assert_eq!(out, "INP: [] []");
}

#[test]
fn null_value_renders_empty() {
    let renderer = ActionRenderer::default();
    let out = renderer
        .render_template("Δ [{{ kpis.gsc.impressions_mom_pct }}]", &sample_payload())
        .unwrap();
    assert_eq!(out, "Δ []");
}

#[test]
fn round_filter_formats_and_tolerates_missing() {
    let renderer = ActionRenderer::default();
    let payload = sample_payload();
    assert_eq!(
        renderer.render_template("{{ kpis.gsc.clicks_mom_pct | round(2) }}", &payload).unwrap(),
        "-0.25"
    );
    assert_eq!(
        renderer.render_template("{{ kpis.gsc.clicks | round }}", &payload).unwrap(),
        "100"
    );
    assert_eq!(
        renderer.render_template("[{{ kpis.cwv.lcp | round(1) }}]", &payload).unwrap(),
        "[]"
    );
}

#[test]
fn round_keeps_floats_without_padding() {
    let renderer = ActionRenderer::default();
    let payload = json!({"delta": -0.3, "score": 5.0, "share": 0.126});
    let render = |tpl: &str| renderer.render_template(tpl, &payload).unwrap();

    assert_eq!(render("{{ delta | round(2) }}"), "-0.3");
    assert_eq!(render("{{ score | round }}"), "5.0");
    assert_eq!(render("{{ share | round(2) }}"), "0.13");
    assert_eq!(render("{{ share | round }}"), "0.0");
}

#[test]
fn case_and_default_filters() {
    let renderer = ActionRenderer::default();
    let payload = sample_payload();
    assert_eq!(
        renderer.render_template("{{ meta.client_name | upper }}", &payload).unwrap(),
        "ACME"
    );
    assert_eq!(
        renderer.render_template("{{ meta.client_name | lower }}", &payload).unwrap(),
        "acme"
    );
    assert_eq!(
        renderer.render_template("{{ kpis.cwv.inp | default('n/a') }}", &payload).unwrap(),
        "n/a"
    );
}

#[test]
fn statement_blocks_are_rejected() {
    let renderer = ActionRenderer::default();
    let result = renderer.render_template("{% for x in kpis %}{{ x }}{% endfor %}", &sample_payload());
    assert!(matches!(result, Err(RenderError::Statement)));
    assert!(matches!(renderer.validate("{% set a = 1 %}"), Err(RenderError::Statement)));
}

#[test]
fn functions_are_not_available() {
    let renderer = ActionRenderer::default();
    assert!(renderer.render_template("{{ range(3) }}", &sample_payload()).is_err());
    assert!(renderer.render_template("{{ env('HOME') }}", &sample_payload()).is_err());
}

#[test]
fn validate_reports_syntax_errors() {
    let renderer = ActionRenderer::default();
    assert!(renderer.validate("Clicks {{ kpis.gsc.clicks }}").is_ok());
    assert!(matches!(renderer.validate("{{ unclosed"), Err(RenderError::Template(_))));
}

#[test]
fn language_lookup_falls_back_to_default() {
    let renderer = ActionRenderer::new("de");
    let rule = rule_with_title(&[("de", "Klicks {{ kpis.gsc.clicks }}"), ("en", "Clicks {{ kpis.gsc.clicks }}")]);
    let payload = sample_payload();

    assert_eq!(renderer.render_title(&rule, &payload, "en"), "Clicks 100");
    assert_eq!(renderer.render_title(&rule, &payload, "de"), "Klicks 100");
    assert_eq!(renderer.render_title(&rule, &payload, "fi"), "Klicks 100");
}

#[test]
fn empty_translation_falls_back_to_default() {
    let renderer = ActionRenderer::new("de");
    let rule = rule_with_title(&[("de", "Deutsch"), ("en", "")]);
    assert_eq!(renderer.render_title(&rule, &sample_payload(), "en"), "Deutsch");
}

#[test]
fn no_template_renders_empty_text() {
    let renderer = ActionRenderer::new("de");
    let rule = rule_with_title(&[("en", "English only")]);
    let text = renderer.render(&rule, &sample_payload(), "fi");
    assert_eq!(text, RenderedText::default());
}

#[test]
fn broken_template_renders_empty_without_failing() {
    let renderer = ActionRenderer::new("de");
    let rule = rule_with_title(&[("de", "{{ unclosed")]);
    assert_eq!(renderer.render_title(&rule, &sample_payload(), "de"), "");
}

