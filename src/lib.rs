// Library for tests to access modules

pub mod assembler;
pub mod collector;
pub mod config;
pub mod disk_repo;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod node;
pub mod source;
pub mod worker;
