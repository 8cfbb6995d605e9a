use clap::Args;
use serde::Serialize;

use goalkit_release::registry::{self, ScriptVariant};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct VariantsArgs {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantListResult {
    pub variants: Vec<&'static ScriptVariant>,
}

pub fn run(
    _args: VariantsArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<VariantListResult> {
    let variants = registry::all_variants().iter().collect();
    Ok((VariantListResult { variants }, 0))
}
