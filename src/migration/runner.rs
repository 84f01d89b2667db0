#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

use eyre::{Context, Result, bail};

use crate::database::{Database, Dialect};

use super::{FOREIGN_KEYS, INDEXES, Step, TABLES, statements, steps};

const COMPLETED: &str = "Database migration completed successfully!";
const PRESERVED: &str = "Maintained all existing data and tables";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub dialect: Dialect,
    pub steps: Vec<Step>,
}

impl MigrationReport {
    pub fn statement_count(&self) -> usize {
        self.steps.iter().map(|step| step.statements.len()).sum()
    }

    /// Lines printed to stdout after a successful run.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![COMPLETED.to_string()];
        lines.extend(self.steps.iter().map(|step| format!("- {}", step.summary)));
        lines.push(format!("- {}", PRESERVED));
        lines
    }
}

/// Applies every step in a single transaction, then checks the resulting
/// schema. Safe to run repeatedly.
pub async fn run<D: Database + ?Sized>(db: &D) -> Result<MigrationReport> {
    let dialect = db.dialect();
    let statements = statements(dialect);
    log::info!(
        "Applying {} statements using the {} dialect",
        statements.len(),
        dialect
    );

    db.apply(statements).await.wrap_err("applying migration")?;

    let steps = steps(dialect);
    for step in steps {
        log::info!("{}", step.summary);
    }

    verify(db).await.wrap_err("verifying schema")?;

    Ok(MigrationReport {
        dialect,
        steps: steps.to_vec(),
    })
}

/// Fails if a table is missing or its columns differ from what the
/// migration creates, if an index is missing or covers other columns, or
/// if the messages foreign key is absent. A table that existed before the
/// first run with a different shape is reported here.
pub async fn verify<D: Database + ?Sized>(db: &D) -> Result<()> {
    for (table, expected) in TABLES {
        let columns = db.table_columns(table).await?;
        if columns.is_empty() {
            bail!("table {} does not exist", table);
        }
        if columns != *expected {
            bail!(
                "table {} has columns [{}], expected [{}]",
                table,
                columns.join(", "),
                expected.join(", ")
            );
        }
    }

    for (table, index, column) in INDEXES {
        let indexes = db.index_names(table).await?;
        if !indexes.iter().any(|name| name == index) {
            bail!("index {} on {} does not exist", index, table);
        }
        let columns = db.index_columns(index).await?;
        if columns != [*column] {
            bail!(
                "index {} on {} covers [{}], expected [{}]",
                index,
                table,
                columns.join(", "),
                column
            );
        }
    }

    for (table, column, referenced) in FOREIGN_KEYS {
        let keys = db.foreign_keys(table).await?;
        if !keys.iter().any(|(from, to)| from == column && to == referenced) {
            bail!(
                "table {} has no foreign key {} -> {}",
                table,
                column,
                referenced
            );
        }
    }

    log::debug!("Schema verified");
    Ok(())
}
