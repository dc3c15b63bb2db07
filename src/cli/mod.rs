//! CLI command implementations

pub mod friend;
pub mod habit;
pub mod init;
pub mod shop;
pub mod user;
