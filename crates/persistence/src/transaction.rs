// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Explicit begin/commit/rollback over SQLite's native transactions.
//!
//! Diesel's closure API (`Connection::transaction`) decides commit or
//! rollback from the closure's return value. Cascades need the decision to
//! be an explicit step, so this module drives Diesel's transaction manager
//! directly and wraps the open transaction in a guard.
//!
//! ## Guarantees
//!
//! - Writes made through [`Transaction::connection`] are invisible to other
//!   connections until [`Transaction::commit`] succeeds.
//! - [`Transaction::rollback`] restores the state as of [`TransactionCoordinator::begin`].
//! - Dropping a [`Transaction`] that was neither committed nor rolled back
//!   (early return, panic, deadline) rolls it back.
//! - The guard borrows the connection mutably, so it cannot be shared by two
//!   units of work.

use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use tracing::{debug, warn};

use crate::error::PersistenceError;

/// Opens transactions and counts how many were opened.
#[derive(Debug, Default)]
pub struct TransactionCoordinator {
    opened: AtomicU64,
}

impl TransactionCoordinator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            opened: AtomicU64::new(0),
        }
    }

    /// Opens a transaction on `conn`.
    ///
    /// Uses `BEGIN IMMEDIATE`, so the database write lock is taken up front
    /// and held until commit or rollback.
    ///
    /// # Errors
    ///
    /// Returns `TransactionFailed` if the transaction cannot be opened,
    /// including when `conn` already has one open.
    pub fn begin<'c>(
        &self,
        conn: &'c mut SqliteConnection,
    ) -> Result<Transaction<'c>, PersistenceError> {
        AnsiTransactionManager::begin_transaction_sql(conn, "BEGIN IMMEDIATE")
            .map_err(|e| PersistenceError::TransactionFailed(format!("begin: {e}")))?;

        let sequence: u64 = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(transaction = sequence, "Transaction opened");

        Ok(Transaction {
            conn,
            sequence,
            finished: false,
        })
    }

    /// Number of transactions successfully opened so far.
    #[must_use]
    pub fn transactions_opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }
}

/// An open transaction. Rolls back on drop unless finished.
pub struct Transaction<'c> {
    conn: &'c mut SqliteConnection,
    sequence: u64,
    finished: bool,
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("sequence", &self.sequence)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Transaction<'_> {
    /// The connection to pass to store calls that belong to this transaction.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut *self.conn
    }

    /// Sequence number assigned by the coordinator, for log correlation.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Commits every write made through this transaction.
    ///
    /// If the commit itself fails the transaction is rolled back before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TransactionFailed` if the commit fails.
    pub fn commit(mut self) -> Result<(), PersistenceError> {
        self.finished = true;
        match <AnsiTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(
            &mut *self.conn,
        ) {
            Ok(()) => {
                debug!(transaction = self.sequence, "Transaction committed");
                Ok(())
            }
            Err(e) => {
                warn!(transaction = self.sequence, error = %e, "Commit failed");
                if is_open(&mut *self.conn) {
                    self.finished = false;
                }
                Err(PersistenceError::TransactionFailed(format!("commit: {e}")))
            }
        }
    }

    /// Discards every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionFailed` if the rollback statement fails.
    pub fn rollback(mut self) -> Result<(), PersistenceError> {
        self.finished = true;
        rollback_transaction(&mut *self.conn, self.sequence)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(
            transaction = self.sequence,
            "Transaction dropped while open, rolling back"
        );
        // Nothing left to report the error to.
        let _ = rollback_transaction(&mut *self.conn, self.sequence);
    }
}

fn rollback_transaction(
    conn: &mut SqliteConnection,
    sequence: u64,
) -> Result<(), PersistenceError> {
    match <AnsiTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(
        conn,
    ) {
        Ok(()) => {
            debug!(transaction = sequence, "Transaction rolled back");
            Ok(())
        }
        Err(e) => {
            warn!(transaction = sequence, error = %e, "Rollback failed");
            Err(PersistenceError::TransactionFailed(format!("rollback: {e}")))
        }
    }
}

fn is_open(conn: &mut SqliteConnection) -> bool {
    matches!(
        <AnsiTransactionManager as TransactionManager<SqliteConnection>>::transaction_manager_status_mut(conn)
            .transaction_depth(),
        Ok(Some(_))
    )
}
