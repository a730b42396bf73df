use crate::auth::AuthContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger;
use crate::core::schedule::DbScheduleResolver;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::ui::messages;
use crate::utils;

/// Handle `bank`: show, close or recompute a worker's hour bank.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Bank {
        worker,
        close,
        recompute,
        acting,
    } = cmd
    {
        let mut pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;

        if *close {
            let actor_ref = acting.as_ref().ok_or_else(|| {
                AppError::Validation("--close requires --as <approver>".to_string())
            })?;
            let actor = db::workers::resolve_worker(&pool.conn, actor_ref)?;
            let ctx = AuthContext::for_worker(&actor);

            let previous = ledger::close_ledger(&mut pool.conn, &ctx, w.id)?;
            messages::success(format!(
                "Bank closed for {}: settled {}",
                w.name,
                utils::mins2readable(previous, true, false)
            ));
            return Ok(());
        }

        if *recompute {
            let balance = ledger::recompute_ledger(&pool.conn, &DbScheduleResolver, w.id)?;
            messages::success(format!(
                "Bank recomputed for {}: {}",
                w.name,
                utils::mins2readable(balance, true, false)
            ));
            return Ok(());
        }

        let bank = ledger::balance(&pool.conn, w.id)?;
        messages::info(format!(
            "Bank for {}: {} ({:+.2}h)",
            w.name,
            utils::colors::paint_signed(
                bank.balance_minutes,
                &utils::mins2readable(bank.balance_minutes, true, false)
            ),
            bank.balance_hours()
        ));
        if let Some(start) = bank.start_date {
            println!("  started {}", start);
        }
    }

    Ok(())
}
