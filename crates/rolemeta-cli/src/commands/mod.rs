pub mod catalog_loader;
pub mod check;
pub mod generate;
pub mod report;
pub mod run_common;
