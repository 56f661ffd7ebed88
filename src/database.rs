use std::{ops::Deref, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

#[derive(Clone)]
pub struct WarehouseConnection(PgPool);

impl WarehouseConnection {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }
}

impl Deref for WarehouseConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Connection parameters for the transactional warehouse.
pub struct WarehouseOptions {
    pub account: String,
    pub user: String,
    pub password: String,
    pub warehouse: String,
    pub database: String,
    pub timeout_seconds: u8,
}

impl WarehouseOptions {
    /// Assemble the connection URL from the individual parameters.
    ///
    /// The compute-unit name travels as the session's application name so the
    /// warehouse can attribute and route the report queries.
    fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}/{}?application_name={}",
            self.user, self.password, self.account, self.database, self.warehouse
        )
    }
}

/// Open the warehouse connection used for the whole run.
///
/// The run issues a handful of sequential queries, so the pool holds a single
/// connection. Connecting is eager; an unreachable warehouse fails the run
/// here, before any range is processed.
pub async fn connect(options: &WarehouseOptions) -> anyhow::Result<WarehouseConnection> {
    debug!(
        account = options.account.as_str(),
        database = options.database.as_str(),
        warehouse = options.warehouse.as_str(),
        "Connecting to the warehouse."
    );

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(options.timeout_seconds.into()))
        .connect(&options.connection_url())
        .await
        .context("Failed to connect to the warehouse.")?;

    Ok(WarehouseConnection::new(pool))
}
