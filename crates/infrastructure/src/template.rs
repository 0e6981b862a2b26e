//! Transaction template.
//!
//! Every repository call runs as one unit of work: a connection is checked
//! out of the pool, a transaction is begun, the unit runs against the
//! connection, and the transaction is completed before the raw result is
//! converted into the caller's shape. The connection goes back to the pool on
//! every exit path.
//!
//! Units are closures of the form
//! `move |conn| Box::pin(async move { ... })`; they must own everything they
//! capture.

use futures::future::BoxFuture;
use pgcrud_common::config::FailurePolicy;
use sqlx::{postgres::PgRow, PgConnection, PgPool};
use tracing::{debug, error};

use crate::database::TransactionExt;
use crate::repositories::PersistentEntity;
use crate::{Error, Result};

/// Runs units of work inside a transaction boundary.
#[derive(Clone, Debug)]
pub struct TransactionTemplate {
    pool: PgPool,
    failure_policy: FailurePolicy,
}

impl TransactionTemplate {
    /// Template rolling back failed units.
    pub fn new(pool: PgPool) -> Self {
        Self::with_policy(pool, FailurePolicy::Rollback)
    }

    /// Template with an explicit failure policy.
    pub fn with_policy(pool: PgPool, failure_policy: FailurePolicy) -> Self {
        Self {
            pool,
            failure_policy,
        }
    }

    /// Pool the template checks connections out of.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Run `unit` in a transaction and return its result unchanged.
    ///
    /// Failures from begin, the unit or commit are logged and surface as
    /// [`Error::Storage`].
    pub async fn execute<R, F>(&self, operation: &'static str, unit: F) -> Result<R>
    where
        R: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<R>> + Send,
    {
        let outcome = async {
            let mut tx = self.pool.begin().await?;
            let result = unit(&mut *tx).await;
            tx.complete(result, self.failure_policy).await
        }
        .await;

        match outcome {
            Ok(value) => {
                debug!(operation, "Unit of work committed");
                Ok(value)
            }
            Err(source) => {
                error!(operation, error = %source, "Something went wrong");
                Err(Error::storage(operation, source))
            }
        }
    }

    /// Run a unit yielding at most one row and convert it into `T`.
    pub async fn single<T, F>(&self, operation: &'static str, unit: F) -> Result<Option<T>>
    where
        T: PersistentEntity,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<Option<PgRow>>>
            + Send,
    {
        match self.execute(operation, unit).await? {
            Some(row) => Ok(Some(Self::convert::<T>(&row)?)),
            None => Ok(None),
        }
    }

    /// Run a unit yielding rows and convert each into `T`, keeping their order.
    pub async fn collection<T, F>(&self, operation: &'static str, unit: F) -> Result<Vec<T>>
    where
        T: PersistentEntity,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<Vec<PgRow>>>
            + Send,
    {
        let rows = self.execute(operation, unit).await?;
        Self::convert_all::<T>(&rows)
    }

    /// Run a side-effecting unit.
    pub async fn void<F>(&self, operation: &'static str, unit: F) -> Result<()>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<()>> + Send,
    {
        self.execute(operation, unit).await
    }

    /// Convert one raw row into `T`; any mismatch is a cast error.
    pub fn convert<T: PersistentEntity>(row: &PgRow) -> Result<T> {
        T::from_row(row).map_err(|e| {
            error!(expected = T::ENTITY_NAME, error = %e, "Result object has the wrong shape");
            Error::Cast {
                expected: T::ENTITY_NAME,
                reason: e.to_string(),
            }
        })
    }

    pub fn convert_all<T: PersistentEntity>(rows: &[PgRow]) -> Result<Vec<T>> {
        rows.iter().map(Self::convert::<T>).collect()
    }
}
