pub(crate) mod args;
pub(crate) mod commands;

pub(crate) use args::{Cli, ServeArgs, TrackArgs};
pub(crate) use commands::Commands;
