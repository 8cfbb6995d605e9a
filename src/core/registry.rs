//! Built-in agent and script-variant registries.
//!
//! Agents describe each supported AI assistant: where rendered command files
//! land inside a package, which file extension they use, and the literal
//! argument placeholder that assistant expands at runtime. Variants select the
//! execution flavor of the bundled automation scripts.

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: &'static str,
    /// Install path for rendered command files, relative to the package root.
    pub commands_dir: &'static str,
    pub file_extension: &'static str,
    /// Literal string substituted for the arguments placeholder token.
    pub arg_placeholder: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion_doc: Option<CompanionDoc>,
}

/// An agent-specific document copied into the package root when the source
/// tree provides one (e.g. `agents/claude.md` installed as `CLAUDE.md`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionDoc {
    pub source: &'static str,
    pub install_as: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVariant {
    pub id: &'static str,
    /// Subdirectory of `scripts/` holding this variant's scripts.
    pub scripts_subdir: &'static str,
}

const AGENTS: &[AgentProfile] = &[
    AgentProfile {
        id: "claude",
        commands_dir: ".claude/commands",
        file_extension: "md",
        arg_placeholder: "$ARGUMENTS",
        companion_doc: Some(CompanionDoc {
            source: "claude.md",
            install_as: "CLAUDE.md",
        }),
    },
    AgentProfile {
        id: "gemini",
        commands_dir: ".gemini/commands",
        file_extension: "md",
        arg_placeholder: "{{args}}",
        companion_doc: Some(CompanionDoc {
            source: "gemini.md",
            install_as: "GEMINI.md",
        }),
    },
    AgentProfile {
        id: "copilot",
        commands_dir: ".github/prompts",
        file_extension: "prompt.md",
        arg_placeholder: "$ARGUMENTS",
        companion_doc: None,
    },
    AgentProfile {
        id: "cursor",
        commands_dir: ".cursor/commands",
        file_extension: "md",
        arg_placeholder: "$ARGUMENTS",
        companion_doc: None,
    },
    AgentProfile {
        id: "windsurf",
        commands_dir: ".windsurf/workflows",
        file_extension: "md",
        arg_placeholder: "$ARGUMENTS",
        companion_doc: None,
    },
    AgentProfile {
        id: "codex",
        commands_dir: ".codex/prompts",
        file_extension: "md",
        arg_placeholder: "$ARGUMENTS",
        companion_doc: Some(CompanionDoc {
            source: "codex.md",
            install_as: "AGENTS.md",
        }),
    },
];

const VARIANTS: &[ScriptVariant] = &[
    ScriptVariant {
        id: "sh",
        scripts_subdir: "bash",
    },
    ScriptVariant {
        id: "ps",
        scripts_subdir: "powershell",
    },
];

pub fn all_agents() -> &'static [AgentProfile] {
    AGENTS
}

pub fn all_variants() -> &'static [ScriptVariant] {
    VARIANTS
}

pub fn agent_ids() -> Vec<String> {
    AGENTS.iter().map(|a| a.id.to_string()).collect()
}

pub fn variant_ids() -> Vec<String> {
    VARIANTS.iter().map(|v| v.id.to_string()).collect()
}

/// Resolve an agent filter against the registry.
///
/// An empty filter selects every agent. Any entry not present in the registry
/// aborts with `config.unknown_agent` listing the allowed values.
pub fn resolve_agents(filter: &[String]) -> Result<Vec<&'static AgentProfile>> {
    if filter.is_empty() {
        return Ok(AGENTS.iter().collect());
    }

    filter
        .iter()
        .map(|id| {
            AGENTS
                .iter()
                .find(|a| a.id == id)
                .ok_or_else(|| Error::config_unknown_agent(id, agent_ids()))
        })
        .collect()
}

/// Resolve a script-variant filter against the registry.
///
/// Same contract as [`resolve_agents`]: empty means all, unknown is fatal.
pub fn resolve_variants(filter: &[String]) -> Result<Vec<&'static ScriptVariant>> {
    if filter.is_empty() {
        return Ok(VARIANTS.iter().collect());
    }

    filter
        .iter()
        .map(|id| {
            VARIANTS
                .iter()
                .find(|v| v.id == id)
                .ok_or_else(|| Error::config_unknown_variant(id, variant_ids()))
        })
        .collect()
}
