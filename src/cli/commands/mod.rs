//! One module per subcommand.  Each exposes an `execute` function.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod reset;
pub mod show;
pub mod status;
