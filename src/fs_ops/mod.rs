//! Filesystem primitives used by the transfer orchestrator.

mod atomic;
mod copy;
mod file_move;
mod helpers;
mod listing;
mod remove;
mod util;

pub use copy::safe_copy_and_rename;
pub use file_move::move_file;
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use listing::list_file_names;
pub use remove::{remove_file_idempotent, RemoveOutcome};
