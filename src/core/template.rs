//! Command-document templates and their frontmatter.
//!
//! Command documents use YAML frontmatter delimited by `---` lines, followed
//! by a placeholder-laden markdown body:
//!
//! ```text
//! ---
//! description: Create a new goal
//! sh: scripts/bash/create-goal.sh --json "{ARGS}"
//! ps: scripts/powershell/create-goal.ps1 -Json "{ARGS}"
//! agent_scripts:
//!   sh: scripts/bash/update-agent-context.sh __AGENT__
//! ---
//! Run `{SCRIPT}` from the repo root and parse its JSON output.
//! ```
//!
//! The top-level `<variant>: <command>` entries and the nested
//! `agent_scripts` map are two independent channels, not a fallback chain.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

/// A parsed command document. Immutable input to the render pipeline.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    pub id: String,
    pub description: String,
    pub script_commands: BTreeMap<String, String>,
    pub agent_script_commands: BTreeMap<String, String>,
    /// Body text with placeholders, line endings normalized to `\n`.
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct RawFrontmatter {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    agent_scripts: BTreeMap<String, String>,
    /// Remaining top-level scalar entries are per-variant script commands.
    #[serde(flatten)]
    scripts: BTreeMap<String, String>,
}

impl CommandTemplate {
    /// Parse raw template text into a typed record.
    ///
    /// A document without a frontmatter block is valid: it has an empty
    /// description and no script commands (which becomes an error only once
    /// the template is rendered against a variant). Malformed YAML is a
    /// structured error, never a silent empty value.
    pub fn parse(id: impl Into<String>, raw: &str) -> Result<Self> {
        let id = id.into();
        let content = normalize_newlines(raw);

        let (frontmatter, body) = match split_frontmatter(&content) {
            Some((fm, body)) => (fm, body),
            None => {
                return Ok(Self {
                    id,
                    description: String::new(),
                    script_commands: BTreeMap::new(),
                    agent_script_commands: BTreeMap::new(),
                    body: content,
                })
            }
        };

        let raw: RawFrontmatter = serde_yml::from_str(frontmatter)
            .map_err(|e| Error::template_invalid_frontmatter(&id, e.to_string()))?;

        Ok(Self {
            id,
            description: raw.description.unwrap_or_default(),
            script_commands: raw.scripts,
            agent_script_commands: raw.agent_scripts,
            body: body.to_string(),
        })
    }

    /// The script command this template resolves for a variant.
    ///
    /// Returns `template.missing_script` when the entry is absent or blank:
    /// shipping a command file without a runnable script is a build defect.
    pub fn script_command(&self, variant: &str) -> Result<&str> {
        match self.script_commands.get(variant).map(|s| s.trim()) {
            Some(cmd) if !cmd.is_empty() => Ok(cmd),
            _ => Err(Error::template_missing_script(&self.id, variant)),
        }
    }

    /// The optional agent-script command for a variant. Blank entries are
    /// treated as absent.
    pub fn agent_script_command(&self, variant: &str) -> Option<&str> {
        self.agent_script_commands
            .get(variant)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// Load every command document under `<source>/templates/commands/`.
///
/// Templates are returned sorted by id so downstream output is stable.
pub fn load_all(source_dir: &Path) -> Result<Vec<CommandTemplate>> {
    let pattern = source_dir.join("templates/commands/*.md");
    let pattern = pattern.to_string_lossy().to_string();

    let paths: Vec<_> = glob::glob(&pattern)
        .map_err(|e| {
            Error::validation_invalid_argument(
                "source",
                format!("Invalid template pattern '{}': {}", pattern, e),
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    if paths.is_empty() {
        return Err(Error::validation_invalid_argument(
            "source",
            format!("No command templates found at {}", pattern),
        )
        .with_hint("Expected markdown command documents under templates/commands/"));
    }

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let raw = io::read_file(&path, "read command template")?;
        templates.push(CommandTemplate::parse(id, &raw)?);
    }

    templates.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(templates)
}

fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Split a leading `---` frontmatter block from the body.
/// Returns None when the document has no frontmatter.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---")?;
    let frontmatter = &rest[..end];

    let after = &rest[end + "\n---".len()..];
    let body = after.strip_prefix('\n').unwrap_or(after);
    Some((frontmatter, body))
}
