use crate::auth::AuthContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attachments::AttachmentStore;
use crate::core::punch;
use crate::core::schedule::DbScheduleResolver;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::punch_kind::PunchKind;
use crate::ui::messages;
use crate::utils;
use std::path::Path;

/// Handle `punch`: self-punch for "now".
pub fn handle_self(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch { worker } = cmd {
        let mut pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;

        let outcome = punch::record_self_punch(&mut pool.conn, &DbScheduleResolver, w.id)?;
        messages::success(outcome.message);
    }

    Ok(())
}

/// Handle `manual`: punch at a past timestamp, subject to review.
pub fn handle_manual(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Manual {
        worker,
        date,
        time,
        kind,
        note,
        acting,
        attachment,
    } = cmd
    {
        let d = utils::date::parse_date(date)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let t = utils::time::parse_time_or_err(time)?;
        let k = PunchKind::from_input(kind)
            .ok_or_else(|| AppError::InvalidPunchKind(kind.to_string()))?;

        let mut pool = db::DbPool::new(&cfg.database)?;
        let target = db::workers::resolve_worker(&pool.conn, worker)?;
        let actor = match acting {
            Some(a) => db::workers::resolve_worker(&pool.conn, a)?,
            None => target.clone(),
        };
        let ctx = AuthContext::for_worker(&actor);

        let attachment_ref = match attachment {
            Some(path) => {
                let store = AttachmentStore::new(&cfg.attachments_dir);
                Some(store.store(Path::new(path))?)
            }
            None => None,
        };

        let outcome = punch::record_manual_punch(
            &mut pool.conn,
            &DbScheduleResolver,
            &ctx,
            target.id,
            d,
            t,
            k,
            note,
            attachment_ref,
        )?;
        messages::success(format!("{} (event {})", outcome.message, outcome.event.id));
    }

    Ok(())
}

/// Handle `punch-approve` / `punch-reject`.
pub fn handle_review(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = db::DbPool::new(&cfg.database)?;

    match cmd {
        Commands::PunchApprove { id, acting } => {
            let actor = db::workers::resolve_worker(&pool.conn, acting)?;
            let ctx = AuthContext::for_worker(&actor);
            let outcome =
                punch::approve_manual_punch(&mut pool.conn, &DbScheduleResolver, &ctx, *id)?;
            messages::success(outcome.message);
        }
        Commands::PunchReject { id, acting, reason } => {
            let actor = db::workers::resolve_worker(&pool.conn, acting)?;
            let ctx = AuthContext::for_worker(&actor);
            let outcome =
                punch::reject_manual_punch(&mut pool.conn, &ctx, *id, reason.as_deref())?;
            messages::success(outcome.message);
        }
        _ => {}
    }

    Ok(())
}
