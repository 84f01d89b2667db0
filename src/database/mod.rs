pub mod postgres;
pub mod sqlite;
pub mod url;

pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use url::{DatabaseUrl, UrlError};

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use eyre::{Context, Result};
use std::{fmt::Display, sync::Arc};

/// SQL flavour spoken by a backend, selects which DDL gets applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database {
    fn dialect(&self) -> Dialect;

    /// Executes the statements in order inside one transaction and commits.
    /// Nothing is committed if any statement fails.
    async fn apply(&self, statements: Vec<&'static str>) -> Result<()>;

    /// Column names of `table` in declaration order, empty if the table
    /// does not exist.
    async fn table_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Names of all indexes defined on `table`.
    async fn index_names(&self, table: &str) -> Result<Vec<String>>;

    /// Columns covered by `index`, in key order.
    async fn index_columns(&self, index: &str) -> Result<Vec<String>>;

    /// (column, referenced table) pairs of the foreign keys on `table`.
    async fn foreign_keys(&self, table: &str) -> Result<Vec<(String, String)>>;
}

pub type ArcDatabase = Arc<dyn Database + Send + Sync>;

/// Opens a single connection to the database the URL points at.
pub async fn connect(url: &DatabaseUrl) -> Result<ArcDatabase> {
    let database: ArcDatabase = match url {
        DatabaseUrl::Postgres { options, .. } => Arc::new(
            Postgres::connect(options)
                .await
                .wrap_err("connecting to postgres")?,
        ),
        DatabaseUrl::Sqlite { path } => Arc::new(
            Sqlite::open(path.as_deref())
                .await
                .wrap_err("opening sqlite database")?,
        ),
    };
    log::debug!("Connected to {} ({})", url.redacted(), database.dialect());
    Ok(database)
}

/// First non-blank line of a statement, used to keep error context short.
pub(crate) fn first_line(statement: &str) -> &str {
    statement
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}
