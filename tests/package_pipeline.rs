use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use goalkit_release::archive::ZipArchiver;
use goalkit_release::pipeline::{self, BuildRequest};
use goalkit_release::registry;

const PLAN_DOC: &str = r#"---
description: Plan the next milestone
sh: run.sh --json "{ARGS}"
ps: run.ps1 -Json "{ARGS}"
agent_scripts:
  sh: scripts/bash/update-agent-context.sh __AGENT__
  ps: scripts/powershell/update-agent-context.ps1 __AGENT__
---

Run `{SCRIPT}` from the repo root, then {AGENT_SCRIPT}.
Consult memory/methodology.md and templates/goal-template.md.
Already-installed copies live at .goalkit/memory/methodology.md.
"#;

fn seed_source(dir: &Path) {
    fs::create_dir_all(dir.join("memory")).unwrap();
    fs::write(dir.join("memory/methodology.md"), "# Methodology\n").unwrap();

    fs::create_dir_all(dir.join("scripts/bash")).unwrap();
    fs::create_dir_all(dir.join("scripts/powershell")).unwrap();
    fs::write(
        dir.join("scripts/bash/update-agent-context.sh"),
        "#!/bin/sh\n",
    )
    .unwrap();
    fs::write(
        dir.join("scripts/powershell/update-agent-context.ps1"),
        "param()\n",
    )
    .unwrap();

    fs::create_dir_all(dir.join("templates/commands")).unwrap();
    fs::write(dir.join("templates/goal-template.md"), "## Goal\n").unwrap();
    fs::write(dir.join("templates/commands/plan.md"), PLAN_DOC).unwrap();

    fs::create_dir_all(dir.join("agents")).unwrap();
    fs::write(dir.join("agents/claude.md"), "# Claude setup\n").unwrap();
}

fn request(tmp: &TempDir, agents: &[&str], variants: &[&str]) -> BuildRequest {
    BuildRequest {
        source_dir: tmp.path().join("src"),
        out_dir: tmp.path().join("dist"),
        version: "v1.0.0".to_string(),
        product: "goalkit".to_string(),
        agent_filter: agents.iter().map(|s| s.to_string()).collect(),
        variant_filter: variants.iter().map(|s| s.to_string()).collect(),
    }
}

fn read_zip_entry(archive_path: &Path, entry: &str) -> String {
    let file = fs::File::open(archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut content = String::new();
    archive
        .by_name(entry)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn zip_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut zips: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "zip").unwrap_or(false))
        .collect();
    zips.sort();
    zips
}

#[test]
fn full_matrix_build_yields_one_artifact_per_cell() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    let run = pipeline::run(&request(&tmp, &[], &[]), &ZipArchiver).unwrap();

    let expected = registry::all_agents().len() * registry::all_variants().len();
    assert_eq!(run.cells, expected);
    assert_eq!(run.artifacts.len(), expected);

    let zips = zip_files_in(&tmp.path().join("dist"));
    assert_eq!(zips.len(), expected);

    for artifact in &run.artifacts {
        assert!(Path::new(&artifact.path).is_file());
        assert!(Path::new(&artifact.checksum_path).is_file());
        assert_eq!(
            artifact.file_name,
            format!(
                "goalkit-template-{}-{}-v1.0.0.zip",
                artifact.agent, artifact.variant
            )
        );
    }
}

#[test]
fn rendered_command_resolves_all_tokens_for_sh_and_ps() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    pipeline::run(&request(&tmp, &["claude"], &[]), &ZipArchiver).unwrap();
    let dist = tmp.path().join("dist");

    let sh = read_zip_entry(
        &dist.join("goalkit-template-claude-sh-v1.0.0.zip"),
        ".claude/commands/plan.md",
    );
    assert!(sh.contains(r#"run.sh --json "$ARGUMENTS""#), "got: {}", sh);
    assert!(sh.contains(".goalkit/scripts/bash/update-agent-context.sh claude"));

    let ps = read_zip_entry(
        &dist.join("goalkit-template-claude-ps-v1.0.0.zip"),
        ".claude/commands/plan.md",
    );
    assert!(ps.contains(r#"run.ps1 -Json "$ARGUMENTS""#), "got: {}", ps);
    assert!(ps.contains(".goalkit/scripts/powershell/update-agent-context.ps1 claude"));

    for rendered in [&sh, &ps] {
        for token in ["{SCRIPT}", "{ARGS}", "{AGENT_SCRIPT}", "__AGENT__"] {
            assert!(!rendered.contains(token), "unresolved {}: {}", token, rendered);
        }
    }
}

#[test]
fn path_rewrite_namespaces_bare_references_exactly_once() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    pipeline::run(&request(&tmp, &["claude"], &["sh"]), &ZipArchiver).unwrap();

    let rendered = read_zip_entry(
        &tmp.path()
            .join("dist/goalkit-template-claude-sh-v1.0.0.zip"),
        ".claude/commands/plan.md",
    );

    assert!(rendered.contains(".goalkit/memory/methodology.md"));
    assert!(rendered.contains(".goalkit/templates/goal-template.md"));
    // The reference that was already namespaced in the source is unchanged.
    assert!(!rendered.contains(".goalkit/.goalkit/"));
}

#[test]
fn package_contains_namespaced_shared_assets_and_companion_doc() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    pipeline::run(&request(&tmp, &["claude"], &["sh"]), &ZipArchiver).unwrap();

    let archive_path = tmp
        .path()
        .join("dist/goalkit-template-claude-sh-v1.0.0.zip");
    let file = fs::File::open(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert!(names.contains(&".goalkit/memory/methodology.md".to_string()));
    assert!(names.contains(&".goalkit/scripts/bash/update-agent-context.sh".to_string()));
    assert!(names.contains(&".goalkit/templates/goal-template.md".to_string()));
    assert!(names.contains(&"CLAUDE.md".to_string()));
    // Variant isolation and source-only files.
    assert!(!names.iter().any(|n| n.contains("powershell")));
    assert!(!names.iter().any(|n| n.contains("templates/commands/")));
}

#[test]
fn two_clean_builds_are_byte_identical() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));
    let req = request(&tmp, &["claude"], &["sh"]);

    pipeline::run(&req, &ZipArchiver).unwrap();
    let dist = tmp.path().join("dist");
    let zip_path = dist.join("goalkit-template-claude-sh-v1.0.0.zip");
    let first_zip = fs::read(&zip_path).unwrap();
    let first_sum = fs::read(dist.join("goalkit-template-claude-sh-v1.0.0.zip.sha256")).unwrap();

    pipeline::run(&req, &ZipArchiver).unwrap();
    let second_zip = fs::read(&zip_path).unwrap();
    let second_sum = fs::read(dist.join("goalkit-template-claude-sh-v1.0.0.zip.sha256")).unwrap();

    assert_eq!(first_zip, second_zip);
    assert_eq!(first_sum, second_sum);
}

#[test]
fn single_cell_filter_produces_exactly_one_archive() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    let run = pipeline::run(&request(&tmp, &["cursor"], &["ps"]), &ZipArchiver).unwrap();

    assert_eq!(run.cells, 1);
    let zips = zip_files_in(&tmp.path().join("dist"));
    assert_eq!(zips.len(), 1);
    assert_eq!(
        zips[0].file_name().unwrap().to_string_lossy(),
        "goalkit-template-cursor-ps-v1.0.0.zip"
    );
}

#[test]
fn unknown_filter_aborts_with_zero_archives() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    let err = pipeline::run(&request(&tmp, &["clippy"], &[]), &ZipArchiver).unwrap_err();
    assert_eq!(err.code.as_str(), "config.unknown_agent");

    let dist = tmp.path().join("dist");
    assert!(!dist.exists() || zip_files_in(&dist).is_empty());
}

#[test]
fn missing_variant_command_fails_and_ships_no_placeholder_text() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    seed_source(&src);
    fs::write(
        src.join("templates/commands/review.md"),
        "---\ndescription: Review progress\nsh: review.sh \"{ARGS}\"\n---\nRun `{SCRIPT}`.\n",
    )
    .unwrap();

    let err = pipeline::run(&request(&tmp, &["claude"], &["ps"]), &ZipArchiver).unwrap_err();
    assert_eq!(err.code.as_str(), "template.missing_script");
    assert!(err.message.contains("review"));
    assert!(err.message.contains("ps"));

    // The failing cell left neither a package tree nor an archive behind.
    let dist = tmp.path().join("dist");
    assert!(zip_files_in(&dist).is_empty());
    assert!(!dist.join("goalkit-template-claude-ps").exists());
}

#[test]
fn invalid_version_aborts_before_touching_prior_output() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    let dist = tmp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("stale.zip"), "previous release").unwrap();

    let mut req = request(&tmp, &[], &[]);
    req.version = "2.nope".to_string();

    let err = pipeline::run(&req, &ZipArchiver).unwrap_err();
    assert_eq!(err.code.as_str(), "config.invalid_version");
    assert!(dist.join("stale.zip").exists());
}

#[test]
fn checksum_sidecar_matches_archive_digest() {
    let tmp = TempDir::new().unwrap();
    seed_source(&tmp.path().join("src"));

    pipeline::run(&request(&tmp, &["claude"], &["sh"]), &ZipArchiver).unwrap();

    let dist = tmp.path().join("dist");
    let content =
        fs::read_to_string(dist.join("goalkit-template-claude-sh-v1.0.0.zip.sha256")).unwrap();
    let (hex, name) = content.trim_end().split_once("  ").unwrap();
    assert_eq!(hex.len(), 64);
    assert_eq!(name, "goalkit-template-claude-sh-v1.0.0.zip");
}
