use async_trait::async_trait;
use eyre::{Context, Result};
use sqlx::{Connection, PgConnection, postgres::PgConnectOptions};
use tokio::sync::Mutex;

use super::{Database, Dialect, first_line};

pub struct Postgres {
    conn: Mutex<PgConnection>,
}

impl Postgres {
    pub async fn connect(options: &PgConnectOptions) -> Result<Self> {
        let conn = PgConnection::connect_with(options)
            .await
            .wrap_err(format!(
                "connecting to {}:{}",
                options.get_host(),
                options.get_port()
            ))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl Database for Postgres {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn apply(&self, statements: Vec<&'static str>) -> Result<()> {
        let mut conn = self.conn.lock().await;
        // Rolled back on drop if any statement fails
        let mut tx = conn.begin().await.wrap_err("beginning transaction")?;
        for statement in statements {
            log::debug!("Executing: {}", statement.trim());
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .wrap_err_with(|| format!("executing {}", first_line(statement)))?;
        }
        tx.commit().await.wrap_err("committing transaction")?;
        Ok(())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let columns = sqlx::query_scalar::<_, String>(
            r#"SELECT column_name::text FROM information_schema.columns
                WHERE table_schema = current_schema() AND table_name = $1
                ORDER BY ordinal_position"#,
        )
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .wrap_err(format!("listing columns of {}", table))?;
        Ok(columns)
    }

    async fn index_names(&self, table: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let indexes = sqlx::query_scalar::<_, String>(
            r#"SELECT indexname::text FROM pg_indexes
                WHERE schemaname = current_schema() AND tablename = $1
                ORDER BY indexname"#,
        )
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .wrap_err(format!("listing indexes of {}", table))?;
        Ok(indexes)
    }

    async fn index_columns(&self, index: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        let columns = sqlx::query_scalar::<_, String>(
            r#"SELECT a.attname::text FROM pg_index i
                JOIN pg_class c ON c.oid = i.indexrelid
                JOIN pg_namespace n ON n.oid = c.relnamespace
                JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey)
                WHERE n.nspname = current_schema() AND c.relname = $1
                ORDER BY array_position(i.indkey::int2[], a.attnum)"#,
        )
        .bind(index)
        .fetch_all(&mut *conn)
        .await
        .wrap_err(format!("listing columns of index {}", index))?;
        Ok(columns)
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.lock().await;
        let keys = sqlx::query_as::<_, (String, String)>(
            r#"SELECT kcu.column_name::text, ccu.table_name::text
                FROM information_schema.table_constraints tc
                JOIN information_schema.key_column_usage kcu
                    ON kcu.constraint_name = tc.constraint_name AND kcu.table_schema = tc.table_schema
                JOIN information_schema.constraint_column_usage ccu
                    ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema
                WHERE tc.constraint_type = 'FOREIGN KEY'
                    AND tc.table_schema = current_schema() AND tc.table_name = $1
                ORDER BY kcu.column_name"#,
        )
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .wrap_err(format!("listing foreign keys of {}", table))?;
        Ok(keys)
    }
}
