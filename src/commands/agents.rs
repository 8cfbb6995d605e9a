use clap::Args;
use serde::Serialize;

use goalkit_release::registry::{self, AgentProfile};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct AgentsArgs {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentListResult {
    pub agents: Vec<&'static AgentProfile>,
}

pub fn run(_args: AgentsArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<AgentListResult> {
    let agents = registry::all_agents().iter().collect();
    Ok((AgentListResult { agents }, 0))
}
