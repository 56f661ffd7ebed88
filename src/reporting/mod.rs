//! The data-refresh pipeline behind the deposit dashboard.

pub mod domain;
pub mod models;
pub mod queries;
pub mod services;
