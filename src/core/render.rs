//! Placeholder substitution and shared-asset path rewriting.
//!
//! Rendering is an ordered list of named substitution steps over the template
//! body. Placeholder resolution always runs before path rewriting, and the
//! path rewrite is idempotent so an already-namespaced reference survives a
//! second pass unchanged.
//!
//! All steps are pure text substitution. A bare directory name occurring in
//! prose or inside a code fence is rewritten like any other occurrence; this
//! over-matching is an accepted limitation of the format.

/// Placeholder for the variant's resolved script command.
pub const SCRIPT_TOKEN: &str = "{SCRIPT}";
/// Placeholder for the variant's resolved agent-script command.
pub const AGENT_SCRIPT_TOKEN: &str = "{AGENT_SCRIPT}";
/// Placeholder for the agent's argument convention.
pub const ARGS_TOKEN: &str = "{ARGS}";
/// Literal marker replaced by the agent id.
pub const AGENT_MARKER: &str = "__AGENT__";

/// Canonical install prefix for shared assets inside a package.
pub const INSTALL_NAMESPACE: &str = ".goalkit";
/// Shared-asset directory names rewritten into the install namespace.
pub const SHARED_ASSET_DIRS: [&str; 3] = ["memory", "scripts", "templates"];

/// Resolved inputs for rendering one template body for one matrix cell.
#[derive(Debug, Clone)]
pub struct RenderInputs<'a> {
    pub script_command: &'a str,
    pub agent_script_command: Option<&'a str>,
    pub arg_placeholder: &'a str,
    pub agent_id: &'a str,
}

/// Render a template body for one (agent, variant) cell.
///
/// Step order is fixed: script command, agent-script command, arguments,
/// agent marker, then path rewriting. The script command itself may contain
/// the arguments token, which the later step resolves.
pub fn render_body(body: &str, inputs: &RenderInputs) -> String {
    let out = resolve_script_command(body, inputs.script_command);
    let out = resolve_agent_script_command(&out, inputs.agent_script_command);
    let out = resolve_args(&out, inputs.arg_placeholder);
    let out = resolve_agent_marker(&out, inputs.agent_id);
    rewrite_shared_asset_paths(&out)
}

pub fn resolve_script_command(body: &str, command: &str) -> String {
    body.replace(SCRIPT_TOKEN, command)
}

/// Replaces the agent-script token only when a command is present. A template
/// that never uses the token is unaffected either way.
pub fn resolve_agent_script_command(body: &str, command: Option<&str>) -> String {
    match command {
        Some(command) => body.replace(AGENT_SCRIPT_TOKEN, command),
        None => body.to_string(),
    }
}

pub fn resolve_args(body: &str, arg_placeholder: &str) -> String {
    body.replace(ARGS_TOKEN, arg_placeholder)
}

pub fn resolve_agent_marker(body: &str, agent_id: &str) -> String {
    body.replace(AGENT_MARKER, agent_id)
}

/// Rewrite bare shared-asset directory references into the namespaced install
/// path, e.g. `memory/methodology.md` becomes `.goalkit/memory/methodology.md`.
///
/// Idempotent via a two-phase swap: references already under the namespace are
/// moved to a private sentinel before the bare-name rewrite, then restored, so
/// they are never double-prefixed.
pub fn rewrite_shared_asset_paths(body: &str) -> String {
    let mut out = body.to_string();

    for dir in SHARED_ASSET_DIRS {
        let bare = format!("{}/", dir);
        let namespaced = format!("{}/{}", INSTALL_NAMESPACE, bare);
        let sentinel = format!("\u{1}GOALKIT_{}\u{1}", dir);

        out = out.replace(&namespaced, &sentinel);
        out = out.replace(&bare, &namespaced);
        out = out.replace(&sentinel, &namespaced);
    }

    out
}
