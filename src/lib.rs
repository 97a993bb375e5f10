// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod models;
pub mod monitor;
pub mod report;
pub mod version;
pub mod worker;
