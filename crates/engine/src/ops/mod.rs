use std::{future::Future, pin::Pin, time::Duration};

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, products};

mod catalog;
mod inventory;
mod ledgers;
mod recipes;

pub use ledgers::WasteLogFilter;

/// Default upper bound for a single atomic unit.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Future returned by the body of [`Engine::with_tx`].
pub(crate) type TxFuture<'a, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'a>>;

/// The inventory engine.
///
/// Holds no state between calls: everything lives in the injected database,
/// so any number of engines (or server workers) can share one store.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    transaction_timeout: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run `body` as one atomic unit.
    ///
    /// The transaction is opened on entry and committed only when `body`
    /// returns `Ok`. An error, or the unit exceeding the configured timeout
    /// (waiting for the write lock included), rolls every write of the unit
    /// back. If the returned future is dropped before completion the open
    /// transaction is rolled back on drop.
    pub(crate) async fn with_tx<T, F>(&self, body: F) -> ResultEngine<T>
    where
        F: for<'a> FnOnce(&'a Engine, &'a DatabaseTransaction) -> TxFuture<'a, T>,
    {
        let db_tx = self.database.begin().await?;
        let unit = async {
            reserve_writer(&db_tx).await?;
            body(self, &db_tx).await
        };
        let outcome = match tokio::time::timeout(self.transaction_timeout, unit).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.transaction_timeout.as_millis())),
        };

        match outcome {
            Ok(value) => {
                db_tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = db_tx.rollback().await {
                    tracing::warn!("rollback failed after \"{err}\": {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Load a product row, failing with `KeyNotFound` when it does not exist.
    pub(crate) async fn require_product(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: &str,
    ) -> ResultEngine<products::Model> {
        products::Entity::find_by_id(product_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("product {product_id}")))
    }

    /// Load a product row for a read-then-write sequence.
    ///
    /// Requests an exclusive row lock (`FOR UPDATE`) on backends that support
    /// it. SQLite serializes writers at the database level instead.
    pub(crate) async fn lock_product(
        &self,
        db_tx: &DatabaseTransaction,
        product_id: &str,
    ) -> ResultEngine<products::Model> {
        products::Entity::find_by_id(product_id.to_string())
            .lock_exclusive()
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("product {product_id}")))
    }
}

/// Take the database write lock before the unit reads anything.
///
/// SQLite opens transactions deferred and ignores `FOR UPDATE`. A unit that
/// reads first and writes later fails with `SQLITE_BUSY` (without waiting)
/// when another connection started writing in between. A write as the first
/// statement makes concurrent units queue on the busy timeout instead.
/// Other backends lock the rows they read with `FOR UPDATE`.
async fn reserve_writer(db_tx: &DatabaseTransaction) -> ResultEngine<()> {
    if db_tx.get_database_backend() == DbBackend::Sqlite {
        db_tx
            .execute_unprepared("UPDATE products SET firebase_id = firebase_id WHERE 0")
            .await?;
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    transaction_timeout: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Upper bound for each atomic unit (defaults to 5 seconds).
    pub fn transaction_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.transaction_timeout = Some(timeout);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let transaction_timeout = self
            .transaction_timeout
            .unwrap_or(DEFAULT_TRANSACTION_TIMEOUT);
        if transaction_timeout.is_zero() {
            return Err(EngineError::InvalidArgument(
                "transaction timeout must be > 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            transaction_timeout,
        })
    }
}
