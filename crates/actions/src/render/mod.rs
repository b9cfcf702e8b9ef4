//! Localized title/reason rendering for selected rules.
//!
//! Templates are interpolated with minijinja against the payload, inside a
//! locked-down environment: no globals, no functions, no statement blocks,
//! and only a handful of pure filters (`round`, `upper`, `lower`, `default`).
//! Missing variables and JSON `null` values render as empty text. A template
//! that fails to compile or render yields an empty string and a warning; it
//! never aborts the report.

use minijinja::value::Value as TemplateValue;
use minijinja::{Environment, Error as TemplateError, ErrorKind, UndefinedBehavior};
use serde_json::Value;

use crate::schema::{LocalizedText, RuleDefinition};

/// Language used when neither the report language nor the configured default is given.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Errors from compiling or rendering a single template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// `{% ... %}` blocks are not part of the template language.
    #[error("statement blocks are not allowed in action templates")]
    Statement,

    #[error("template error: {0}")]
    Template(String),
}

/// Rendered user-facing text for one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    pub title: String,
    pub reason: String,
}

/// Expands a rule's localized templates against the payload.
pub struct ActionRenderer {
    default_language: String,
    env: Environment<'static>,
}

impl ActionRenderer {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            env: build_env(),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Render both title and reason for `rule` in `language`.
    pub fn render(&self, rule: &RuleDefinition, payload: &Value, language: &str) -> RenderedText {
        RenderedText {
            title: self.render_title(rule, payload, language),
            reason: self.render_localized(rule, &rule.reason, "reason", payload, language),
        }
    }

    pub fn render_title(&self, rule: &RuleDefinition, payload: &Value, language: &str) -> String {
        self.render_localized(rule, &rule.title, "title", payload, language)
    }

    /// Pick the template for `language`, falling back to the default language.
    ///
    /// Empty translations count as missing.
    pub fn select_template<'a>(&self, text: &'a LocalizedText, language: &str) -> Option<&'a str> {
        [language, self.default_language.as_str()]
            .into_iter()
            .filter_map(|lang| text.get(lang))
            .map(String::as_str)
            .find(|tpl| !tpl.is_empty())
    }

    /// Render a template string against `payload`.
    pub fn render_template(&self, template: &str, payload: &Value) -> Result<String, RenderError> {
        reject_statements(template)?;
        self.env
            .render_str(template, payload)
            .map_err(|e| RenderError::Template(e.to_string()))
    }

    /// Check that a template compiles without evaluating it.
    pub fn validate(&self, template: &str) -> Result<(), RenderError> {
        reject_statements(template)?;
        self.env
            .template_from_str(template)
            .map_err(|e| RenderError::Template(e.to_string()))?;
        Ok(())
    }

    fn render_localized(
        &self,
        rule: &RuleDefinition,
        text: &LocalizedText,
        part: &str,
        payload: &Value,
        language: &str,
    ) -> String {
        let Some(template) = self.select_template(text, language) else {
            return String::new();
        };
        match self.render_template(template, payload) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(rule_id = %rule.id, part, error = %e, "failed to render action text");
                String::new()
            }
        }
    }
}

impl Default for ActionRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

fn reject_statements(template: &str) -> Result<(), RenderError> {
    if template.contains("{%") {
        return Err(RenderError::Statement);
    }
    Ok(())
}

/// Build the restricted environment shared by all renders.
fn build_env() -> Environment<'static> {
    let mut env = Environment::empty();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_formatter(|out, state, value| {
        if value.is_undefined() || value.is_none() {
            return Ok(());
        }
        minijinja::escape_formatter(out, state, value)
    });

    env.add_filter("round", round_filter);
    env.add_filter("lower", lower_filter);
    env.add_filter("upper", upper_filter);
    env.add_filter("default", default_filter);
    env
}

/// Round a number to N decimal places, Jinja2 style: integers pass through,
/// floats stay floats (`-0.3 | round(2)` is `-0.3`, `5.0 | round` is `5.0`).
/// Halves round away from zero. Missing values stay empty.
fn round_filter(value: TemplateValue, decimals: Option<u32>) -> Result<TemplateValue, TemplateError> {
    if value.is_undefined() || value.is_none() {
        return Ok(TemplateValue::from(""));
    }
    if value.is_integer() {
        return Ok(value);
    }
    let number = f64::try_from(value.clone()).map_err(|_| {
        TemplateError::new(ErrorKind::InvalidOperation, format!("cannot round {value}"))
    })?;
    let scale = 10f64.powi(decimals.unwrap_or(0) as i32);
    Ok(TemplateValue::from((number * scale).round() / scale))
}

fn lower_filter(value: TemplateValue) -> String {
    display_or_empty(&value).to_lowercase()
}

fn upper_filter(value: TemplateValue) -> String {
    display_or_empty(&value).to_uppercase()
}

fn display_or_empty(value: &TemplateValue) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Replace a missing or null value with `fallback`.
fn default_filter(value: TemplateValue, fallback: Option<TemplateValue>) -> TemplateValue {
    if value.is_undefined() || value.is_none() {
        fallback.unwrap_or_else(|| TemplateValue::from(""))
    } else {
        value
    }
}

#[cfg(test)]
mod tests;
