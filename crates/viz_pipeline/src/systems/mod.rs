//! The standard system set, grouped by phase.

pub mod commit;
pub mod init;
pub mod sync;
