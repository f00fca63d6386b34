pub mod compile;
mod command_result;
pub mod extract;
pub mod filter;
pub mod helper;
pub mod import;
pub mod init;
pub mod init_config;
pub mod stats;
pub mod update;

pub use command_result::*;
