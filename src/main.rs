use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{agents, package, variants, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "goalkit-release")]
#[command(version = VERSION)]
#[command(about = "Build per-agent Goalkit release template packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and archive template packages for the agent/variant matrix
    Package(package::PackageArgs),
    /// List supported agents
    Agents(agents::AgentsArgs),
    /// List supported script variants
    Variants(variants::VariantsArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = match cli.command {
        Commands::Package(args) => output::map_cmd_result_to_json(package::run(args, &global)),
        Commands::Agents(args) => output::map_cmd_result_to_json(agents::run(args, &global)),
        Commands::Variants(args) => output::map_cmd_result_to_json(variants::run(args, &global)),
    };

    output::print_json_result(json_result);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
