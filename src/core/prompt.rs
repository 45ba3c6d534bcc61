//! Prompt templates for the three agent calls.
//!
//! A template is plain text with `{name}` tokens. Each [`PromptKind`]
//! declares the tokens it fills; rendering replaces those tokens in a single
//! pass and leaves any other `{...}` text untouched.

use crate::errors::TemplateError;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

static TASK_TEMPLATE: &str = include_str!("prompts/task.txt");
static PRIORITY_TEMPLATE: &str = include_str!("prompts/priority.txt");
static EXECUTE_TEMPLATE: &str = include_str!("prompts/execute.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Task,
    Priority,
    Execute,
}

impl PromptKind {
    #[cfg(test)]
    pub const ALL: [PromptKind; 3] = [
        PromptKind::Task,
        PromptKind::Priority,
        PromptKind::Execute,
    ];

    /// File stem of the template on disk
    pub fn name(&self) -> &'static str {
        match self {
            PromptKind::Task => "task",
            PromptKind::Priority => "priority",
            PromptKind::Execute => "execute",
        }
    }

    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            PromptKind::Task => &["objective", "result", "task_description", "tasks"],
            PromptKind::Priority => &["objective", "next_task_id", "task_names"],
            PromptKind::Execute => &["objective", "task", "context"],
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            PromptKind::Task => TASK_TEMPLATE,
            PromptKind::Priority => PRIORITY_TEMPLATE,
            PromptKind::Execute => EXECUTE_TEMPLATE,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named values for one kind of template
pub trait PromptParams {
    const KIND: PromptKind;

    fn values(&self) -> Vec<(&'static str, String)>;
}

pub struct TaskPromptParams<'a> {
    pub objective: &'a str,
    pub result: &'a str,
    pub task_description: &'a str,
    pub tasks: &'a [String],
}

impl PromptParams for TaskPromptParams<'_> {
    const KIND: PromptKind = PromptKind::Task;

    fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("objective", self.objective.to_string()),
            ("result", self.result.to_string()),
            ("task_description", self.task_description.to_string()),
            ("tasks", self.tasks.join(", ")),
        ]
    }
}

pub struct PriorityPromptParams<'a> {
    pub objective: &'a str,
    pub next_task_id: u64,
    pub task_names: &'a [String],
}

impl PromptParams for PriorityPromptParams<'_> {
    const KIND: PromptKind = PromptKind::Priority;

    fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("objective", self.objective.to_string()),
            ("next_task_id", self.next_task_id.to_string()),
            ("task_names", self.task_names.join(", ")),
        ]
    }
}

pub struct ExecutePromptParams<'a> {
    pub objective: &'a str,
    pub task: &'a str,
    pub context: &'a str,
}

impl PromptParams for ExecutePromptParams<'_> {
    const KIND: PromptKind = PromptKind::Execute;

    fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("objective", self.objective.to_string()),
            ("task", self.task.to_string()),
            ("context", self.context.to_string()),
        ]
    }
}

/// Placeholders that disagree with the declared set of a kind
#[derive(Debug, Default, PartialEq)]
pub struct PlaceholderReport {
    /// Tokens found in the text that the kind does not fill
    pub unknown: Vec<String>,
    /// Declared tokens that never appear in the text
    pub missing: Vec<String>,
}

impl PlaceholderReport {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    kind: PromptKind,
    text: String,
}

impl PromptTemplate {
    pub fn new(kind: PromptKind, text: impl Into<String>) -> Self {
        PromptTemplate {
            kind,
            text: text.into(),
        }
    }

    pub fn placeholder_report(&self) -> PlaceholderReport {
        let declared = self.kind.placeholders();
        let found = scan_placeholders(&self.text);

        let mut unknown: Vec<String> = Vec::new();
        for token in &found {
            if !declared.contains(token) && !unknown.iter().any(|u| u == token) {
                unknown.push(token.to_string());
            }
        }
        let missing = declared
            .iter()
            .filter(|d| !found.contains(d))
            .map(|d| d.to_string())
            .collect();

        PlaceholderReport { unknown, missing }
    }

    /// Substitutes every declared token in one pass over the text
    pub fn render<P: PromptParams>(&self, params: &P) -> String {
        debug_assert_eq!(P::KIND, self.kind, "prompt parameters for the wrong template");
        let values = params.values();
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];
            match token_at(after) {
                Some(token) => {
                    match values.iter().find(|(name, _)| *name == token) {
                        Some((_, value)) => out.push_str(value),
                        None => out.push_str(&after[..token.len() + 2]),
                    }
                    rest = &after[token.len() + 2..];
                }
                None => {
                    out.push('{');
                    rest = &after[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Returns the identifier of a `{identifier}` token starting at `text[0]`
fn token_at(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?;
    let close = inner.find('}')?;
    let name = &inner[..close];
    let is_identifier =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_identifier.then_some(name)
}

fn scan_placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open..];
        match token_at(after) {
            Some(token) => {
                found.push(token);
                rest = &after[token.len() + 2..];
            }
            None => rest = &after[1..],
        }
    }
    found
}

fn load_template(
    base: &Path,
    kind: PromptKind,
    strict: bool,
) -> Result<PromptTemplate, TemplateError> {
    let path = base.join(format!("{}.txt", kind.name()));
    let template = if path.is_file() {
        let text = std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded '{}' prompt from {}", kind, path.display());
        PromptTemplate::new(kind, text)
    } else {
        info!(
            "No '{}' prompt at {}, using built-in template",
            kind,
            path.display()
        );
        PromptTemplate::new(kind, kind.builtin())
    };

    let report = template.placeholder_report();
    if !report.is_clean() {
        if strict {
            return Err(TemplateError::Placeholders {
                kind,
                unknown: report.unknown,
                missing: report.missing,
            });
        }
        warn!(
            "Prompt '{}' has unknown placeholders {:?} and is missing {:?}",
            kind, report.unknown, report.missing
        );
    }
    Ok(template)
}

/// The three templates used by a run, resolved once at startup
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    task: PromptTemplate,
    priority: PromptTemplate,
    execute: PromptTemplate,
}

impl PromptLibrary {
    /// Templates compiled into the binary
    pub fn builtin() -> Self {
        PromptLibrary {
            task: PromptTemplate::new(PromptKind::Task, TASK_TEMPLATE),
            priority: PromptTemplate::new(PromptKind::Priority, PRIORITY_TEMPLATE),
            execute: PromptTemplate::new(PromptKind::Execute, EXECUTE_TEMPLATE),
        }
    }

    /// Loads `<dir>/<provider>/<model>/<name>.txt` for every kind.
    ///
    /// A kind without a file falls back to its built-in template. Templates
    /// whose placeholders disagree with their kind are logged, or rejected
    /// when `strict` is set.
    pub fn load(
        dir: &Path,
        provider: &str,
        model: &str,
        strict: bool,
    ) -> Result<Self, TemplateError> {
        let base = dir.join(provider).join(model);
        Ok(PromptLibrary {
            task: load_template(&base, PromptKind::Task, strict)?,
            priority: load_template(&base, PromptKind::Priority, strict)?,
            execute: load_template(&base, PromptKind::Execute, strict)?,
        })
    }

    pub fn get(&self, kind: PromptKind) -> &PromptTemplate {
        match kind {
            PromptKind::Task => &self.task,
            PromptKind::Priority => &self.priority,
            PromptKind::Execute => &self.execute,
        }
    }

    pub fn render<P: PromptParams>(&self, params: &P) -> String {
        self.get(P::KIND).render(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builtin_templates_match_their_placeholders() {
        let library = PromptLibrary::builtin();
        for kind in PromptKind::ALL {
            assert!(
                library.get(kind).placeholder_report().is_clean(),
                "built-in '{}' template",
                kind
            );
        }
    }

    #[test]
    fn unknown_tokens_are_left_verbatim() {
        let template = PromptTemplate::new(
            PromptKind::Execute,
            "Goal {objective}; do {task}; ctx {context}; keep {language} and {not a token}",
        );
        let rendered = template.render(&ExecutePromptParams {
            objective: "Plan a picnic",
            task: "List needed items",
            context: "",
        });
        assert_eq!(
            rendered,
            "Goal Plan a picnic; do List needed items; ctx ; keep {language} and {not a token}"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let template = PromptTemplate::new(PromptKind::Execute, "{objective} / {task}");
        let rendered = template.render(&ExecutePromptParams {
            objective: "write about {task}",
            task: "draft",
            context: "",
        });
        assert_eq!(rendered, "write about {task} / draft");
    }

    #[test]
    fn list_placeholders_are_comma_joined() {
        let names = vec!["Buy food".to_string(), "Pack blanket".to_string()];
        let template = PromptTemplate::new(
            PromptKind::Priority,
            "{task_names} | {objective} | {next_task_id}",
        );
        let rendered = template.render(&PriorityPromptParams {
            objective: "Plan a picnic",
            next_task_id: 2,
            task_names: &names,
        });
        assert_eq!(rendered, "Buy food, Pack blanket | Plan a picnic | 2");
    }

    #[test]
    fn report_lists_unknown_and_missing_tokens() {
        let template =
            PromptTemplate::new(PromptKind::Task, "{objective} {result} {extra} {extra}");
        let report = template.placeholder_report();
        assert_eq!(report.unknown, vec!["extra"]);
        assert_eq!(report.missing, vec!["task_description", "tasks"]);
    }

    #[test]
    fn loads_overrides_from_provider_model_directory() {
        let dir = TempDir::new().unwrap();
        let model_dir = dir.path().join("openai").join("gpt-3.5-turbo");
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(
            model_dir.join("execute.txt"),
            "Objective: {objective}\nContext: {context}\nTask: {task}",
        )
        .unwrap();

        let library = PromptLibrary::load(dir.path(), "openai", "gpt-3.5-turbo", true).unwrap();
        let rendered = library.render(&ExecutePromptParams {
            objective: "O",
            task: "T",
            context: "C",
        });
        assert_eq!(rendered, "Objective: O\nContext: C\nTask: T");
        assert_eq!(library.get(PromptKind::Task), PromptLibrary::builtin().get(PromptKind::Task));
    }

    #[test]
    fn strict_loading_rejects_mismatched_template() {
        let dir = TempDir::new().unwrap();
        let model_dir = dir.path().join("ollama").join("llama3");
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join("priority.txt"), "Reorder {tasks} for {objective}").unwrap();

        match PromptLibrary::load(dir.path(), "ollama", "llama3", true) {
            Err(TemplateError::Placeholders {
                kind,
                unknown,
                missing,
            }) => {
                assert_eq!(kind, PromptKind::Priority);
                assert_eq!(unknown, vec!["tasks"]);
                assert_eq!(missing, vec!["next_task_id", "task_names"]);
            }
            other => panic!("expected placeholder error, got {:?}", other),
        }

        assert!(PromptLibrary::load(dir.path(), "ollama", "llama3", false).is_ok());
    }
}
