#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};
use tokio_rusqlite::{Connection, params};

use super::{Database, Dialect, first_line};

pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    pub async fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(path) => Connection::open(path)
                .await
                .wrap_err(format!("opening database path: {}", path))?,
            None => Connection::open_in_memory()
                .await
                .wrap_err("opening in-memory database")?,
        };

        // Off by default in SQLite, and per connection
        conn.call(|conn| Ok(conn.execute_batch("PRAGMA foreign_keys = ON;")?))
            .await
            .wrap_err("enabling foreign keys")?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl Database for Sqlite {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn apply(&self, statements: Vec<&'static str>) -> Result<()> {
        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for statement in statements {
                    log::debug!("Executing: {}", statement.trim());
                    // Rolled back when tx drops
                    if let Err(err) = tx.execute_batch(statement) {
                        return Ok(Err(eyre::Report::new(err)
                            .wrap_err(format!("executing {}", first_line(statement)))));
                    }
                }
                tx.commit()?;
                Ok(Ok(()))
            })
            .await
            .wrap_err("running transaction")?;
        outcome
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let name = table.to_string();
        let columns = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
                let columns = stmt
                    .query_map(params![name], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(columns)
            })
            .await
            .wrap_err(format!("listing columns of {}", table))?;
        Ok(columns)
    }

    async fn index_names(&self, table: &str) -> Result<Vec<String>> {
        let name = table.to_string();
        let indexes = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT name FROM pragma_index_list(?1) ORDER BY name")?;
                let indexes = stmt
                    .query_map(params![name], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(indexes)
            })
            .await
            .wrap_err(format!("listing indexes of {}", table))?;
        Ok(indexes)
    }

    async fn index_columns(&self, index: &str) -> Result<Vec<String>> {
        let name = index.to_string();
        let columns = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
                let columns = stmt
                    .query_map(params![name], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(columns)
            })
            .await
            .wrap_err(format!("listing columns of index {}", index))?;
        Ok(columns)
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<(String, String)>> {
        let name = table.to_string();
        let keys = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT "from", "table" FROM pragma_foreign_key_list(?1) ORDER BY "from""#,
                )?;
                let keys = stmt
                    .query_map(params![name], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .wrap_err(format!("listing foreign keys of {}", table))?;
        Ok(keys)
    }
}
