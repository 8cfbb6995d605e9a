use clap::Args;
use std::path::PathBuf;

use goalkit_release::archive::ZipArchiver;
use goalkit_release::pipeline::{self, BuildRequest, BuildRun};
use goalkit_release::utils::args::parse_filter_list;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct PackageArgs {
    /// Source tree holding memory/, scripts/, templates/ and agents/
    #[arg(long)]
    pub source: String,

    /// Output directory for assembled packages and archives
    #[arg(long, default_value = "dist")]
    pub out: String,

    /// Release version (vMAJOR.MINOR.PATCH)
    #[arg(long)]
    pub version: String,

    /// Agents to build for (comma or space separated; default: all)
    #[arg(long)]
    pub agents: Vec<String>,

    /// Script variants to build for (comma or space separated; default: all)
    #[arg(long)]
    pub variants: Vec<String>,

    /// Artifact name prefix
    #[arg(long, default_value = "goalkit")]
    pub product: String,
}

pub fn run(args: PackageArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<BuildRun> {
    let request = BuildRequest {
        source_dir: expand_path(&args.source),
        out_dir: expand_path(&args.out),
        version: args.version,
        product: args.product,
        agent_filter: parse_filter_list(&args.agents),
        variant_filter: parse_filter_list(&args.variants),
    };

    let run = pipeline::run(&request, &ZipArchiver)?;
    Ok((run, 0))
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
