//! Enrichment through an external program.
//!
//! The program receives one `EnrichmentRequest` as JSON on stdin and
//! answers with the explanation text on stdout. Protocol:
//!
//! - exit status 0 with text: the explanation
//! - exit status 0 with blank output: no explanation available
//! - non-zero exit status: failure, stderr is reported in the error
//!
//! The API key, when configured, is passed in the `REGWATCH_API_KEY`
//! environment variable and never appears in the request or in logs.

#![allow(clippy::result_large_err)]

use regwatch_core::config::EnrichmentConfig;
use regwatch_core::errors::{ExError, ExErrorKind, Result};
use regwatch_core::{Change, ChangeKind, Enricher};
use regwatch_core_types::Sensitive;
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

pub const API_KEY_ENV: &str = "REGWATCH_API_KEY";

/// Suffix marking an excerpt that was cut short
const ELLIPSIS: &str = "...";

const INSTRUCTIONS: &str = "You are an expert in government contracting and federal \
acquisition regulations. Explain changes in simple, business-friendly language.";

/// Payload written to the enrichment program's stdin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRequest {
    pub section_id: String,
    pub change_type: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub summary: String,
    pub old_excerpt: String,
    pub new_excerpt: String,
    pub instructions: String,
    /// Ready-to-send user prompt built from the fields above
    pub prompt: String,
}

impl EnrichmentRequest {
    pub fn from_change(change: &Change, max_excerpt_chars: usize) -> Self {
        let old_excerpt = excerpt(&change.old_content, max_excerpt_chars);
        let new_excerpt = excerpt(&change.new_content, max_excerpt_chars);
        let prompt = format!(
            "Explain this regulation change in plain English that a business owner \
             could understand.\n\n\
             Section: {}\n\
             Change Type: {}\n\n\
             Old Content:\n{}\n\n\
             New Content:\n{}\n\n\
             Please provide a brief summary of what changed, why it might matter to \
             contractors, and any action items for businesses.",
            change.section_id, change.kind, old_excerpt, new_excerpt
        );
        Self {
            section_id: change.section_id.clone(),
            change_type: change.kind,
            similarity: change.similarity,
            summary: change.summary.clone(),
            old_excerpt,
            new_excerpt,
            instructions: INSTRUCTIONS.to_string(),
            prompt,
        }
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Runs the configured program once per change.
pub struct CommandEnricher {
    name: String,
    program: String,
    args: Vec<String>,
    max_excerpt_chars: usize,
    api_key: Option<Sensitive<String>>,
}

impl CommandEnricher {
    pub fn new(program: impl Into<String>, args: Vec<String>, max_excerpt_chars: usize) -> Self {
        let program = program.into();
        Self {
            name: format!("command:{}", program),
            program,
            args,
            max_excerpt_chars,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Sensitive<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// `None` when the configuration names no command.
    pub fn from_config(config: &EnrichmentConfig) -> Option<Self> {
        let (program, args) = config.command.split_first()?;
        let enricher = Self::new(program.clone(), args.to_vec(), config.max_excerpt_chars);
        Some(match &config.api_key {
            Some(key) => enricher.with_api_key(key.clone()),
            None => enricher,
        })
    }

    fn failure(&self, change: &Change, message: String) -> ExError {
        ExError::new(ExErrorKind::ExternalService)
            .with_op("enrich")
            .with_entity_id(self.program.clone())
            .with_section_id(change.section_id.clone())
            .with_message(message)
    }
}

impl Enricher for CommandEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    fn explain(&self, change: &Change) -> Result<Option<String>> {
        let request = EnrichmentRequest::from_change(change, self.max_excerpt_chars);
        let payload = serde_json::to_vec(&request)?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(key) = &self.api_key {
            command.env(API_KEY_ENV, key.expose());
        }

        let mut child = command
            .spawn()
            .map_err(|e| self.failure(change, format!("Failed to start: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A program that ignores its input may close stdin early
            if let Err(e) = stdin.write_all(&payload) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(self.failure(change, format!("Failed to write request: {}", e)));
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(change, format!("Failed to wait: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(
                change,
                format!("Exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(
            section_id = %change.section_id,
            enricher = %self.name,
            chars = text.len(),
            "Enrichment answered"
        );
        Ok((!text.is_empty()).then_some(text))
    }
}
