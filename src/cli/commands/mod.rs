//! One module per subcommand. Each `execute` calls into `ams_lib` and
//! renders the structured result.

pub mod completions;
pub mod create;
pub mod doctor;
pub mod done;
pub mod init;
pub mod list;
pub mod ready;
pub mod show;
pub mod update;
pub mod version;
