pub mod component;
pub mod config;
pub mod init;
pub mod signal;
pub mod tools;
