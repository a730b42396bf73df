use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report;
use crate::core::schedule::DbScheduleResolver;
use crate::db;
use crate::errors::AppResult;
use crate::ui::messages;
use crate::utils;

/// Handle `today`: live view of the current day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Today { worker, json } = cmd {
        let pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;
        let view = report::today_view(&pool.conn, &DbScheduleResolver, w.id)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        messages::info(format!("{} — {}", w.name, view.date));
        if view.events.is_empty() {
            println!("  no events yet today");
        }
        for ev in &view.events {
            println!(
                "  {:>5}  {:<3}  {:<9} {}",
                ev.id,
                ev.kind.to_db_str(),
                ev.status.to_db_str(),
                ev.time_str()
            );
        }

        match view.expected_hours {
            Some(h) => println!("  expected {:.2}h", h),
            None => println!("  no schedule assigned today"),
        }
        println!(
            "  status {}  extras {:.2}h  deficit {:.2}h",
            view.status.to_db_str(),
            view.extra_hours,
            view.deficit_hours
        );
        println!(
            "  bank {}",
            utils::colors::paint_signed(
                view.bank_minutes,
                &utils::mins2readable(view.bank_minutes, true, false)
            )
        );
    }

    Ok(())
}
