use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::errors::AppResult;

/// Handle `log`: print the internal audit log.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print } = cmd
        && *print
    {
        let pool = db::DbPool::new(&cfg.database)?;
        for (date, operation, message) in db::audit::load_log(&pool.conn)? {
            println!("{}  {:<22}  {}", date, operation, message);
        }
    }

    Ok(())
}
