//! Session factory: opens fresh, non-pooled database sessions.
//!
//! Each phase of the harness owns its own `Session`; dropping it tears
//! the connection down on every exit path.

use crate::config::DbConfig;
use crate::error::{HarnessError, Result};
use std::ops::{Deref, DerefMut};
use tokio_postgres::{Client, NoTls};
use tracing::debug;

/// An authenticated database session scoped to one logical phase.
///
/// Wraps a `tokio_postgres::Client` together with its connection task.
/// Dereferences to the client, so queries and transactions are used
/// directly on the session.
pub struct Session {
    client: Client,
    conn_task: tokio::task::JoinHandle<()>,
}

impl Session {
    /// Open a fresh session. Fails with a `Connection` error when the
    /// server is unreachable or credentials are rejected.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let pg_config = config.pg_config()?;

        let (client, connection) = pg_config
            .connect(NoTls)
            .await
            .map_err(HarnessError::Connection)?;

        // The connection future must be driven for the client to make
        // progress; it completes when the client is dropped.
        let conn_task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("connection task ended: {}", e);
            }
        });

        Ok(Self { client, conn_task })
    }
}

impl Deref for Session {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.conn_task.abort();
    }
}
