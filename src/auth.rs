//! Per-call authorization context.
//!
//! Capability never comes from ambient state: every protected operation
//! receives an explicit `AuthContext` describing who is acting and whether
//! they hold the approval capability.

use crate::errors::{AppError, AppResult};
use crate::models::worker::Worker;

#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub worker_id: i64,
    pub approver: bool,
}

impl AuthContext {
    pub fn for_worker(worker: &Worker) -> Self {
        Self {
            worker_id: worker.id,
            approver: worker.approver,
        }
    }

    /// Guard for operations that require the approval capability.
    pub fn require_approver(&self) -> AppResult<()> {
        if self.approver {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "worker {} does not hold the approval capability",
                self.worker_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_approver_rejects_plain_workers() {
        let ctx = AuthContext {
            worker_id: 7,
            approver: false,
        };
        let err = ctx.require_approver().unwrap_err();
        assert_eq!(err.kind(), "authorization");

        let ctx = AuthContext {
            worker_id: 1,
            approver: true,
        };
        assert!(ctx.require_approver().is_ok());
    }
}
