// Commands module for the CLI subcommands

pub mod cache;
pub mod extract;
pub mod init;
pub mod provide;
pub mod resolve;
