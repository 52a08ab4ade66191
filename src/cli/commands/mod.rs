//! Command implementations

pub mod completions;
pub mod contact;
pub mod dash;
pub mod deal;
pub mod export;
pub mod health;
pub mod init;
pub mod pro;
pub mod task;
pub mod timeline;
pub mod validate;
