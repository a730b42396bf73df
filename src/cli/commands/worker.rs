use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::DayExpectation;
use crate::ui::messages;
use crate::utils;
use chrono::Weekday;

fn parse_weekday(s: &str) -> AppResult<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        other => Err(AppError::Validation(format!("unknown weekday '{}'", other))),
    }
}

/// Handle `worker-add`.
pub fn handle_add(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::WorkerAdd {
        name,
        approver,
        default_schedule,
        since,
    } = cmd
    {
        if name.trim().is_empty() {
            return Err(AppError::Validation("worker name must not be empty".into()));
        }

        let created_at = match since {
            Some(s) => utils::date::parse_date(s)
                .ok_or_else(|| AppError::InvalidDate(s.to_string()))?,
            None => utils::date::today(),
        };

        let pool = db::DbPool::new(&cfg.database)?;
        let id = db::workers::insert_worker(&pool.conn, name.trim(), *approver, created_at)?;

        if *default_schedule {
            let entry = utils::time::parse_time(&cfg.default_entry_time);
            let exit = utils::time::parse_time(&cfg.default_exit_time);
            let expectation = DayExpectation {
                expected_minutes: (cfg.default_expected_hours * 60.0).round() as i64,
                entry,
                exit,
                min_break_minutes: cfg.default_min_break_minutes,
            };
            for day in [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ] {
                db::schedules::upsert_slot(&pool.conn, id, day, &expectation)?;
            }
        }

        let _ = db::audit::ttlog(
            &pool.conn,
            "worker_add",
            name,
            &format!("Worker {} registered (approver: {})", name, approver),
        );
        messages::success(format!("Worker '{}' registered with id {}", name, id));
    }

    Ok(())
}

/// Handle `workers` (list).
pub fn handle_list(cfg: &Config) -> AppResult<()> {
    let pool = db::DbPool::new(&cfg.database)?;
    let workers = db::workers::list_workers(&pool.conn)?;

    if workers.is_empty() {
        messages::info("No workers registered yet");
        return Ok(());
    }

    for w in workers {
        println!(
            "{:>4}  {}  {}",
            w.id,
            if w.approver { "[approver]" } else { "          " },
            w.name
        );
    }

    Ok(())
}

/// Handle `schedule`: set or clear one weekday slot.
pub fn handle_schedule(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule {
        worker,
        day,
        hours,
        entry,
        exit,
        break_minutes,
        clear,
    } = cmd
    {
        let weekday = parse_weekday(day)?;
        let pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;

        if *clear {
            db::schedules::clear_slot(&pool.conn, w.id, weekday)?;
            messages::success(format!("Cleared {} schedule for {}", day, w.name));
            return Ok(());
        }

        let hours = (*hours).ok_or_else(|| {
            AppError::Validation("either --hours or --clear is required".to_string())
        })?;
        if !(0.0..=24.0).contains(&hours) {
            return Err(AppError::Validation(format!(
                "expected hours {} out of range",
                hours
            )));
        }

        let entry = match entry {
            Some(s) => Some(utils::time::parse_time_or_err(s)?),
            None => None,
        };
        let exit = match exit {
            Some(s) => Some(utils::time::parse_time_or_err(s)?),
            None => None,
        };

        let expectation = DayExpectation {
            expected_minutes: (hours * 60.0).round() as i64,
            entry,
            exit,
            min_break_minutes: (*break_minutes).unwrap_or(cfg.default_min_break_minutes),
        };
        db::schedules::upsert_slot(&pool.conn, w.id, weekday, &expectation)?;

        messages::success(format!(
            "Schedule for {} on {}: {}h (entry {}, exit {})",
            w.name,
            day,
            hours,
            utils::time::format_time_opt(expectation.entry),
            utils::time::format_time_opt(expectation.exit),
        ));
    }

    Ok(())
}
