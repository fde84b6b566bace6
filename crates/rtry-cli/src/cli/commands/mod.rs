//! CLI command handlers, one file per subcommand.

mod exec;
mod schedule;

pub use exec::run_exec;
pub use schedule::run_schedule;

#[cfg(test)]
pub(crate) use exec::{classify_exit, spawn_interrupt_listener};
#[cfg(test)]
pub(crate) use schedule::schedule_rows;
