//! Output files of an `evaluate` run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use seo_report_actions::{Selection, SelectionSummary};
use seo_report_core::Config;

pub const ACTIONS_FILE: &str = "actions.json";
pub const ACTIONS_DEBUG_FILE: &str = "actions_debug.json";
pub const RUN_TRACE_FILE: &str = "run_trace.json";

/// Run metadata written to `run_trace.json`.
#[derive(Debug, Serialize)]
struct RunTrace {
    generated_at: String,
    rules_path: PathBuf,
    language: String,
    summary: SelectionSummary,
    steps: Vec<RunStep>,
    config: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct RunStep {
    name: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    artifacts: Vec<PathBuf>,
}

impl RunStep {
    fn done(name: &'static str) -> Self {
        Self {
            name,
            status: "done",
            artifacts: Vec::new(),
        }
    }
}

pub struct RunArtifacts {
    dir: PathBuf,
}

impl RunArtifacts {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Write all artifacts and return their paths in write order.
    pub fn write(&self, selection: &Selection, rules_path: &Path, config: &Config) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let actions_path = self.dir.join(ACTIONS_FILE);
        fs::write(&actions_path, selection.actions_json()?)?;

        let debug_path = self.dir.join(ACTIONS_DEBUG_FILE);
        fs::write(&debug_path, selection.trace_json()?)?;

        let run_trace_path = self.dir.join(RUN_TRACE_FILE);
        let run_trace = RunTrace {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            rules_path: rules_path.to_path_buf(),
            language: selection.language.clone(),
            summary: selection.summary(),
            steps: vec![
                RunStep::done("load rules"),
                RunStep::done("load project"),
                RunStep::done("evaluate actions"),
                RunStep {
                    name: "write outputs",
                    status: "done",
                    artifacts: vec![actions_path.clone(), debug_path.clone()],
                },
            ],
            config: config.summary(),
        };
        fs::write(&run_trace_path, serde_json::to_string_pretty(&run_trace)?)?;

        Ok(vec![actions_path, debug_path, run_trace_path])
    }
}
