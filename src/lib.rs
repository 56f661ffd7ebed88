pub mod cli;
pub mod database;
pub mod reporting;
pub mod site;
