//! CLI commands

pub mod form;
pub mod init;
pub mod license;
