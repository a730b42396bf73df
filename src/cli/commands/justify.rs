use crate::auth::AuthContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attachments::AttachmentStore;
use crate::core::justification;
use crate::core::schedule::DbScheduleResolver;
use crate::db;
use crate::errors::{AppError, AppResult};
use crate::models::justification::JustificationKind;
use crate::ui::messages;
use crate::utils;
use std::path::Path;

/// Handle `justify`: file a dispute against a divergent day.
pub fn handle_create(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Justify {
        worker,
        date,
        kind,
        description,
        attachment,
    } = cmd
    {
        let d = utils::date::parse_date(date)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let k = JustificationKind::from_db_str(&kind.to_lowercase())
            .ok_or_else(|| AppError::InvalidJustificationKind(kind.to_string()))?;

        let mut pool = db::DbPool::new(&cfg.database)?;
        let w = db::workers::resolve_worker(&pool.conn, worker)?;

        let attachment_ref = match attachment {
            Some(path) => {
                let store = AttachmentStore::new(&cfg.attachments_dir);
                Some(store.store(Path::new(path))?)
            }
            None => None,
        };

        let j = justification::create_justification(
            &mut pool.conn,
            &DbScheduleResolver,
            w.id,
            d,
            k,
            description.as_deref(),
            attachment_ref,
        )?;

        messages::success(format!(
            "Justification {} filed for {} on {} ({})",
            j.id,
            w.name,
            d,
            j.status.to_db_str()
        ));
    }

    Ok(())
}

/// Handle `justify-approve` / `justify-reject`.
pub fn handle_review(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = db::DbPool::new(&cfg.database)?;

    match cmd {
        Commands::JustifyApprove { id, acting } => {
            let actor = db::workers::resolve_worker(&pool.conn, acting)?;
            let ctx = AuthContext::for_worker(&actor);
            let j = justification::approve_justification(
                &mut pool.conn,
                &DbScheduleResolver,
                &ctx,
                *id,
            )?;
            messages::success(format!(
                "Justification {} ({}) approved for {}",
                j.id,
                j.kind.to_db_str(),
                j.date
            ));
        }
        Commands::JustifyReject { id, acting, reason } => {
            let actor = db::workers::resolve_worker(&pool.conn, acting)?;
            let ctx = AuthContext::for_worker(&actor);
            let j = justification::reject_justification(
                &mut pool.conn,
                &DbScheduleResolver,
                &ctx,
                *id,
                reason.as_deref(),
            )?;
            messages::success(format!(
                "Justification {} ({}) rejected for {}",
                j.id,
                j.kind.to_db_str(),
                j.date
            ));
        }
        _ => {}
    }

    Ok(())
}
