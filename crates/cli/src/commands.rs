use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use seo_report_actions::trace::diff_traces;
use seo_report_actions::validation::validate_yaml;
use seo_report_actions::{
    ActionRenderer, ActionSelector, Project, RuleSet, RuleSource, Selection, TraceEntry,
};
use seo_report_core::Config;

use crate::artifacts::RunArtifacts;
use crate::cli::{DiffArgs, EvaluateArgs, ExplainArgs, SelectionInputs, ValidateArgs};
use crate::explain::render_explanation;

/// Everything needed to run one selection, loaded from disk.
struct LoadedInputs {
    rules_path: PathBuf,
    rules: RuleSet,
    project: Project,
    payload: Value,
}

impl LoadedInputs {
    fn load(config: &Config, inputs: &SelectionInputs) -> Result<Self> {
        let rules_path = inputs.rules.clone().unwrap_or_else(|| config.rules.path.clone());
        let rules = RuleSource::load_file(&rules_path)
            .with_context(|| format!("failed to load rules from {}", rules_path.display()))?;
        let project = Project::load_file(&inputs.project).with_context(|| {
            format!("failed to load project from {}", inputs.project.display())
        })?;
        let payload = read_json(&inputs.payload)?;
        Ok(Self {
            rules_path,
            rules,
            project,
            payload,
        })
    }

    fn select(&self, config: &Config, lang: Option<&str>) -> Selection {
        let renderer = ActionRenderer::new(config.report.default_language.clone());
        let selector = ActionSelector::with_renderer(&self.rules, renderer);
        let selection = match lang {
            Some(lang) => selector.select(&self.payload, &self.project, lang),
            None => selector.select_for_payload(&self.payload, &self.project),
        };
        if !config.report.is_supported(&selection.language) {
            warn!(
                language = %selection.language,
                supported = %config.report.supported_languages.join(","),
                "report language is not in the supported list; default-language templates are used where missing"
            );
        }
        selection
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn evaluate(config: &Config, args: EvaluateArgs) -> Result<ExitCode> {
    let loaded = LoadedInputs::load(config, &args.inputs)?;
    let selection = loaded.select(config, args.inputs.lang.as_deref());

    let out_dir = args.out_dir.unwrap_or_else(|| config.output.dir.clone());
    let artifacts = RunArtifacts::new(&out_dir);
    let written = artifacts
        .write(&selection, &loaded.rules_path, config)
        .with_context(|| format!("failed to write artifacts to {}", out_dir.display()))?;
    info!(dir = %out_dir.display(), files = written.len(), "artifacts written");

    let summary = selection.summary();
    println!(
        "{} actions ({} from fallback) in '{}': {}",
        summary.included,
        summary.fallback,
        selection.language,
        selection.action_ids().join(", ")
    );
    for path in &written {
        println!("  wrote {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

pub fn validate(config: &Config, args: ValidateArgs) -> Result<ExitCode> {
    let path = args.rules.unwrap_or_else(|| config.rules.path.clone());
    let yaml = fs::read_to_string(&path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;

    let result = validate_yaml(&yaml, &config.report.default_language);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.valid {
        info!(path = %path.display(), warnings = result.warnings.len(), "rule file is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(path = %path.display(), errors = result.errors.len(), "rule file is invalid");
        Ok(ExitCode::FAILURE)
    }
}

pub fn explain(config: &Config, args: ExplainArgs) -> Result<ExitCode> {
    let loaded = LoadedInputs::load(config, &args.inputs)?;
    let selection = loaded.select(config, args.inputs.lang.as_deref());
    print!("{}", render_explanation(&selection, args.rule.as_deref()));
    Ok(ExitCode::SUCCESS)
}

pub fn diff(args: DiffArgs) -> Result<ExitCode> {
    let before = read_trace(&args.before)?;
    let after = read_trace(&args.after)?;

    let diffs = diff_traces(&before, &after);
    println!("{}", serde_json::to_string_pretty(&diffs)?);
    info!(changed = diffs.len(), "trace comparison complete");
    Ok(ExitCode::SUCCESS)
}

fn read_trace(path: &Path) -> Result<Vec<TraceEntry>> {
    let value = read_json(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("{} is not an action trace", path.display()))
}
