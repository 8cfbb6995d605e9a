pub type CmdResult<T> = goalkit_release::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod agents;
pub mod package;
pub mod variants;
