use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report;
use crate::core::schedule::DbScheduleResolver;
use crate::db;
use crate::errors::AppResult;
use crate::models::day_record::{DayStatus, hours_to_minutes};
use crate::ui::messages;
use crate::utils;
use crate::utils::table::{Column, Table};

/// Handle `report`: monthly report for one worker.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        worker,
        month,
        json,
    } = cmd
    {
        let (year, m) = utils::date::parse_month(month)?;

        let pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;
        let days = report::monthly_report(&pool.conn, &DbScheduleResolver, w.id, year, m)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&days)?);
            return Ok(());
        }

        messages::info(format!("Report {} — {}", month, w.name));

        let mut table = Table::new(vec![
            Column { header: "date".into(), width: 10 },
            Column { header: "worked".into(), width: 7 },
            Column { header: "extras".into(), width: 7 },
            Column { header: "deficit".into(), width: 7 },
            Column { header: "status".into(), width: 9 },
            Column { header: "justifications".into(), width: 30 },
        ]);

        let mut balance_minutes = 0i64;
        for day in &days {
            balance_minutes += hours_to_minutes(day.extra_hours) - hours_to_minutes(day.deficit_hours);

            let justs = day
                .justifications
                .iter()
                .map(|j| format!("{} ({})", j.kind.to_db_str(), j.status.to_db_str()))
                .collect::<Vec<_>>()
                .join(", ");

            table.add_row(vec![
                day.date.format("%Y-%m-%d").to_string(),
                utils::formatting::hours2str(day.worked_hours),
                utils::formatting::hours2str(day.extra_hours),
                utils::formatting::hours2str(day.deficit_hours),
                utils::colors::paint_day_status(
                    day.status == DayStatus::Divergent,
                    day.status.to_db_str(),
                ),
                justs,
            ]);
        }

        print!("{}", table.render());
        println!(
            "month net: {}",
            utils::colors::paint_signed(
                balance_minutes,
                &utils::mins2readable(balance_minutes, true, false)
            )
        );
    }

    Ok(())
}
