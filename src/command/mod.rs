mod core;
mod dispatch;
mod parse;
mod spec;
mod types;

pub use dispatch::{CommandDispatchResult, dispatch};
pub(crate) use parse::expand_home;
pub use parse::{parse_command_text, parse_page_number};
pub use spec::{command_registry, find_spec, usage};
pub use types::{
    ActionId, ArgKind, ArgSpec, Command, CommandEffect, CommandOutcome, CommandSpec,
};
