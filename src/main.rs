use convo_migrate::cli::Command;
use convo_migrate::config::init_logger;
use convo_migrate::{database, migration};
use eyre::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    better_panic::install();

    let config = cmd.get_config()?;
    init_logger(&config.log).wrap_err("initializing logger")?;

    let url = config.database_url()?;
    log::info!("Migrating {}", url.redacted());

    let db = database::connect(&url)
        .await
        .wrap_err("connecting to database")?;
    let report = migration::run(db.as_ref()).await?;
    log::info!(
        "Applied {} statements in {} steps",
        report.statement_count(),
        report.steps.len()
    );

    for line in report.summary_lines() {
        println!("{}", line);
    }
    Ok(())
}
