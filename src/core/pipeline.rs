//! The release packaging pipeline.
//!
//! A build runs a fixed sequence of phases:
//! INIT (validate inputs, load templates) -> CLEAN (purge the output root) ->
//! RENDER (assemble each matrix cell) -> ARCHIVE (compress + checksum) ->
//! DONE. A fatal INIT error prevents CLEAN, so a bad invocation never touches
//! prior output. A failing cell has its partial tree discarded without
//! blocking the remaining cells, but any cell failure fails the run: nothing
//! is handed to a publisher and the exit code is non-zero.

use std::path::PathBuf;

use serde::Serialize;

use crate::archive::{self, Archiver};
use crate::error::{Error, Result};
use crate::publish::{ReleaseArtifact, ReleasePublisher, ReleaseRequest};
use crate::registry::{self, AgentProfile, ScriptVariant};
use crate::template::{self, CommandTemplate};
use crate::utils::{io, validation};
use crate::version::validate_release_version;

/// Caller-supplied build inputs, before validation.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub source_dir: PathBuf,
    pub out_dir: PathBuf,
    pub version: String,
    /// Artifact name prefix, e.g. "goalkit" in `goalkit-template-claude-sh-v1.0.0.zip`.
    pub product: String,
    /// Normalized agent ids; empty selects the full registry.
    pub agent_filter: Vec<String>,
    /// Normalized variant ids; empty selects the full registry.
    pub variant_filter: Vec<String>,
}

/// Validated, immutable context threaded through every phase.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub source_dir: PathBuf,
    pub out_dir: PathBuf,
    pub version: String,
    pub product: String,
    pub agents: Vec<&'static AgentProfile>,
    pub variants: Vec<&'static ScriptVariant>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRun {
    pub product: String,
    pub version: String,
    pub cells: usize,
    pub artifacts: Vec<ReleaseArtifact>,
}

/// Run the full pipeline with the given archiver.
pub fn run(request: &BuildRequest, archiver: &dyn Archiver) -> Result<BuildRun> {
    let (ctx, templates) = init(request, archiver)?;
    clean(&ctx)?;
    let artifacts = build_cells(&ctx, &templates, archiver)?;

    Ok(BuildRun {
        product: ctx.product,
        version: ctx.version,
        cells: artifacts.len(),
        artifacts,
    })
}

/// INIT: validate the version format and filters, probe the archiver, and
/// load the template set. Registries and templates are read once here; the
/// later phases only consume them.
fn init(
    request: &BuildRequest,
    archiver: &dyn Archiver,
) -> Result<(BuildContext, Vec<CommandTemplate>)> {
    let version = request.version.trim();
    validate_release_version(version)?;

    let product =
        validation::require_non_empty(&request.product, "product", "Product name is required")?;

    let agents = registry::resolve_agents(&request.agent_filter)?;
    let variants = registry::resolve_variants(&request.variant_filter)?;

    archiver.ensure_available()?;

    let templates = template::load_all(&request.source_dir)?;

    Ok((
        BuildContext {
            source_dir: request.source_dir.clone(),
            out_dir: request.out_dir.clone(),
            version: version.to_string(),
            product: product.to_string(),
            agents,
            variants,
        },
        templates,
    ))
}

/// CLEAN: purge the prior output root. Completes before any cell renders.
fn clean(ctx: &BuildContext) -> Result<()> {
    io::purge_dir(&ctx.out_dir, "clean output root")
}

/// RENDER + ARCHIVE over the matrix.
///
/// Cells are independent; each reads the shared template set and writes only
/// its own subtree, so a failure discards that cell's partial output and the
/// loop continues. The first error is reported once the matrix completes.
fn build_cells(
    ctx: &BuildContext,
    templates: &[CommandTemplate],
    archiver: &dyn Archiver,
) -> Result<Vec<ReleaseArtifact>> {
    let mut artifacts = Vec::new();
    let mut first_error: Option<Error> = None;

    for &agent in &ctx.agents {
        for &variant in &ctx.variants {
            match build_cell(ctx, templates, archiver, agent, variant) {
                Ok(artifact) => artifacts.push(artifact),
                Err(err) => {
                    crate::log_status!(
                        "package",
                        "Cell {}-{} failed: {}",
                        agent.id,
                        variant.id,
                        err
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(artifacts),
    }
}

fn build_cell(
    ctx: &BuildContext,
    templates: &[CommandTemplate],
    archiver: &dyn Archiver,
    agent: &'static AgentProfile,
    variant: &'static ScriptVariant,
) -> Result<ReleaseArtifact> {
    let base_name = format!("{}-template-{}-{}", ctx.product, agent.id, variant.id);
    let package_root = ctx.out_dir.join(&base_name);

    crate::log_status!("package", "Assembling {}", base_name);

    let spec =
        match crate::package::assemble(&ctx.source_dir, &package_root, agent, variant, templates) {
            Ok(spec) => spec,
            Err(err) => {
                discard(&package_root);
                return Err(err);
            }
        };

    // A cell is archive-eligible only once its render completed in full.
    let file_name = format!("{}-{}.zip", base_name, ctx.version);
    let artifact_path = ctx.out_dir.join(&file_name);

    let archived = archiver
        .archive(&spec.root, &artifact_path)
        .and_then(|_| archive::write_checksum(&artifact_path));

    let checksum_path = match archived {
        Ok(path) => path,
        Err(err) => {
            discard(&package_root);
            let _ = std::fs::remove_file(&artifact_path);
            return Err(err);
        }
    };

    crate::log_status!("archive", "Wrote {}", artifact_path.display());

    Ok(ReleaseArtifact {
        agent: agent.id.to_string(),
        variant: variant.id.to_string(),
        file_name,
        path: artifact_path.display().to_string(),
        checksum_path: checksum_path.display().to_string(),
    })
}

fn discard(package_root: &std::path::Path) {
    let _ = std::fs::remove_dir_all(package_root);
}

/// Hand a finished build to a release publisher.
///
/// Only a successful [`run`] produces a `BuildRun`, so failed builds can
/// never reach a publisher. Returns false when the version tag is already
/// published, leaving the existing release untouched.
pub fn hand_off(
    build: &BuildRun,
    notes: impl Into<String>,
    publisher: &dyn ReleasePublisher,
) -> Result<bool> {
    if publisher.release_exists(&build.version)? {
        crate::log_status!("publish", "Release {} already exists, skipping", build.version);
        return Ok(false);
    }

    let request = ReleaseRequest {
        tag: build.version.clone(),
        title: format!("{} {}", build.product, build.version),
        notes: notes.into(),
        artifacts: build.artifacts.clone(),
    };
    publisher.publish(&request)?;
    Ok(true)
}
