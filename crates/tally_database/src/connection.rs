//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use tally_error::{DatabaseError, DatabaseErrorKind};

/// Connection pool shared by all ledger operations.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build a connection pool for the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable (a `.env` file is honored)
/// to determine the connection string. Failure here is the one process-fatal
/// condition in the system; every later storage failure stays scoped to the
/// operation that hit it.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - The pool cannot establish its initial connection
pub fn establish_pool() -> DatabaseResult<PgPool> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    Pool::builder()
        .build(ConnectionManager::new(database_url))
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}
