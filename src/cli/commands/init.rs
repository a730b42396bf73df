use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db;
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `init` command: create config, database and schema.
pub fn handle(cli: &Cli, db_path: &str) -> AppResult<()> {
    Config::init_all(cli.db.clone(), cli.test)?;

    let pool = db::DbPool::new(db_path)?;
    db::init_db(&pool.conn)?;
    messages::success(format!("Database initialized at {}", db_path));

    if let Err(e) = db::audit::ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", db_path),
    ) {
        messages::warning(format!("Failed to write internal log: {}", e));
    }

    Ok(())
}
