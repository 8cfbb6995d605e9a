//! Package assembly: one isolated output tree per (agent, variant) cell.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::{AgentProfile, ScriptVariant};
use crate::render::{self, RenderInputs, INSTALL_NAMESPACE};
use crate::template::CommandTemplate;
use crate::utils::io;

/// Source-tree file excluded from the templates copy: it configures the
/// agent's editor, not the installed package.
const EDITOR_CONFIG_FILE: &str = "vscode-settings.json";
/// Source subdirectory holding command documents; rendered, never copied.
const COMMANDS_SOURCE_DIR: &str = "commands";

/// The assembled, isolated file tree for one (agent, variant) combination.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    pub agent: &'static AgentProfile,
    pub variant: &'static ScriptVariant,
    pub root: PathBuf,
}

/// Assemble one matrix cell into `root`.
///
/// Reads only from the shared source tree and writes only under `root`, so
/// cells never interfere with each other. Optional shared-asset directories
/// that are absent are logged and skipped; a template without a script
/// command for this cell's variant fails the cell.
pub fn assemble(
    source_dir: &Path,
    root: &Path,
    agent: &'static AgentProfile,
    variant: &'static ScriptVariant,
    templates: &[CommandTemplate],
) -> Result<PackageSpec> {
    io::create_dir_all(root, "create package root")?;

    copy_memory(source_dir, root)?;
    copy_scripts(source_dir, root, variant)?;
    copy_templates(source_dir, root)?;
    render_commands(root, agent, variant, templates)?;
    copy_companion_doc(source_dir, root, agent)?;

    Ok(PackageSpec {
        agent,
        variant,
        root: root.to_path_buf(),
    })
}

fn copy_memory(source_dir: &Path, root: &Path) -> Result<()> {
    let src = source_dir.join("memory");
    if !src.is_dir() {
        log_skip("memory", &src);
        return Ok(());
    }

    let dest = root.join(INSTALL_NAMESPACE).join("memory");
    io::copy_dir_recursive(&src, &dest, "copy memory assets")
}

/// Copy the variant-relevant script subset plus variant-agnostic loose files.
/// Other variants' subdirectories stay out of the package.
fn copy_scripts(source_dir: &Path, root: &Path, variant: &ScriptVariant) -> Result<()> {
    let src = source_dir.join("scripts");
    if !src.is_dir() {
        log_skip("scripts", &src);
        return Ok(());
    }

    let dest = root.join(INSTALL_NAMESPACE).join("scripts");
    io::create_dir_all(&dest, "create scripts dir")?;

    let variant_dir = src.join(variant.scripts_subdir);
    if variant_dir.is_dir() {
        io::copy_dir_recursive(
            &variant_dir,
            &dest.join(variant.scripts_subdir),
            "copy variant scripts",
        )?;
    }

    for entry in io::sorted_entries(&src, "list scripts")? {
        let path = entry.path();
        if path.is_file() {
            io::copy_file(&path, &dest.join(entry.file_name()), "copy loose script")?;
        }
    }

    Ok(())
}

/// Copy template assets except the command-document source directory and the
/// agent-editor configuration file.
fn copy_templates(source_dir: &Path, root: &Path) -> Result<()> {
    let src = source_dir.join("templates");
    if !src.is_dir() {
        log_skip("templates", &src);
        return Ok(());
    }

    let dest = root.join(INSTALL_NAMESPACE).join("templates");
    io::create_dir_all(&dest, "create templates dir")?;

    for entry in io::sorted_entries(&src, "list templates")? {
        let name = entry.file_name();
        let path = entry.path();

        if path.is_dir() {
            if name == COMMANDS_SOURCE_DIR {
                continue;
            }
            io::copy_dir_recursive(&path, &dest.join(&name), "copy template assets")?;
        } else {
            if name == EDITOR_CONFIG_FILE {
                continue;
            }
            io::copy_file(&path, &dest.join(&name), "copy template assets")?;
        }
    }

    Ok(())
}

/// Render every command template into the agent's command directory.
fn render_commands(
    root: &Path,
    agent: &AgentProfile,
    variant: &ScriptVariant,
    templates: &[CommandTemplate],
) -> Result<()> {
    let commands_dir = root.join(agent.commands_dir);
    io::create_dir_all(&commands_dir, "create commands dir")?;

    for template in templates {
        let script_command = template.script_command(variant.id)?;
        let inputs = RenderInputs {
            script_command,
            agent_script_command: template.agent_script_command(variant.id),
            arg_placeholder: agent.arg_placeholder,
            agent_id: agent.id,
        };

        let rendered = render::render_body(&template.body, &inputs);
        let file_name = format!("{}.{}", template.id, agent.file_extension);
        io::write_file(&commands_dir.join(file_name), &rendered, "write command file")?;
    }

    Ok(())
}

fn copy_companion_doc(source_dir: &Path, root: &Path, agent: &AgentProfile) -> Result<()> {
    let Some(companion) = &agent.companion_doc else {
        return Ok(());
    };

    let src = source_dir.join("agents").join(companion.source);
    if !src.is_file() {
        return Ok(());
    }

    io::copy_file(&src, &root.join(companion.install_as), "copy companion doc")
}

fn log_skip(kind: &str, path: &Path) {
    crate::log_status!("package", "No {} assets at {}, skipping", kind, path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use std::fs;
    use tempfile::TempDir;

    fn agent(id: &str) -> &'static AgentProfile {
        registry::all_agents().iter().find(|a| a.id == id).unwrap()
    }

    fn variant(id: &str) -> &'static ScriptVariant {
        registry::all_variants().iter().find(|v| v.id == id).unwrap()
    }

    fn seed_source(dir: &Path) {
        fs::create_dir_all(dir.join("memory")).unwrap();
        fs::write(dir.join("memory/methodology.md"), "# Methodology\n").unwrap();

        fs::create_dir_all(dir.join("scripts/bash")).unwrap();
        fs::create_dir_all(dir.join("scripts/powershell")).unwrap();
        fs::write(dir.join("scripts/bash/create-goal.sh"), "#!/bin/sh\n").unwrap();
        fs::write(dir.join("scripts/powershell/create-goal.ps1"), "param()\n").unwrap();
        fs::write(dir.join("scripts/common.sh"), "# shared\n").unwrap();

        fs::create_dir_all(dir.join("templates/commands")).unwrap();
        fs::write(dir.join("templates/goal-template.md"), "## Goal\n").unwrap();
        fs::write(dir.join("templates/vscode-settings.json"), "{}\n").unwrap();
        fs::write(dir.join("templates/commands/plan.md"), "ignored\n").unwrap();

        fs::create_dir_all(dir.join("agents")).unwrap();
        fs::write(dir.join("agents/claude.md"), "# Claude setup\n").unwrap();
    }

    fn plan_template() -> CommandTemplate {
        CommandTemplate::parse(
            "plan",
            "---\nsh: scripts/bash/plan.sh \"{ARGS}\"\nps: scripts/powershell/plan.ps1 \"{ARGS}\"\n---\nRun `{SCRIPT}` as __AGENT__. See memory/methodology.md.\n",
        )
        .unwrap()
    }

    #[test]
    fn assembles_isolated_namespaced_tree() {
        let tmp = TempDir::new().unwrap();
        seed_source(tmp.path());
        let root = tmp.path().join("out/pkg");

        let templates = vec![plan_template()];
        assemble(tmp.path(), &root, agent("claude"), variant("sh"), &templates).unwrap();

        assert!(root.join(".goalkit/memory/methodology.md").is_file());
        assert!(root.join(".goalkit/scripts/bash/create-goal.sh").is_file());
        assert!(root.join(".goalkit/scripts/common.sh").is_file());
        assert!(!root.join(".goalkit/scripts/powershell").exists());
        assert!(root.join(".goalkit/templates/goal-template.md").is_file());
        assert!(!root.join(".goalkit/templates/commands").exists());
        assert!(!root.join(".goalkit/templates/vscode-settings.json").exists());
        assert!(root.join("CLAUDE.md").is_file());

        let rendered = fs::read_to_string(root.join(".claude/commands/plan.md")).unwrap();
        assert_eq!(
            rendered,
            "Run `.goalkit/scripts/bash/plan.sh \"$ARGUMENTS\"` as claude. See .goalkit/memory/methodology.md.\n"
        );
    }

    #[test]
    fn missing_optional_assets_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("templates/commands")).unwrap();
        let root = tmp.path().join("out/pkg");

        let templates = vec![plan_template()];
        assemble(tmp.path(), &root, agent("cursor"), variant("ps"), &templates).unwrap();

        assert!(!root.join(".goalkit/memory").exists());
        assert!(!root.join(".goalkit/scripts").exists());
        let rendered = fs::read_to_string(root.join(".cursor/commands/plan.md")).unwrap();
        assert!(rendered.contains(".goalkit/scripts/powershell/plan.ps1"));
    }

    #[test]
    fn companion_doc_only_copied_when_source_provides_it() {
        let tmp = TempDir::new().unwrap();
        seed_source(tmp.path());
        let root = tmp.path().join("out/pkg");

        let templates = vec![plan_template()];
        assemble(tmp.path(), &root, agent("codex"), variant("sh"), &templates).unwrap();

        // agents/codex.md is not in the fixture
        assert!(!root.join("AGENTS.md").exists());
    }

    #[test]
    fn template_without_variant_command_fails_the_cell() {
        let tmp = TempDir::new().unwrap();
        seed_source(tmp.path());
        let root = tmp.path().join("out/pkg");

        let templates =
            vec![CommandTemplate::parse("plan", "---\nsh: run.sh\n---\n{SCRIPT}\n").unwrap()];
        let err = assemble(tmp.path(), &root, agent("claude"), variant("ps"), &templates)
            .unwrap_err();
        assert_eq!(err.code.as_str(), "template.missing_script");
    }
}
