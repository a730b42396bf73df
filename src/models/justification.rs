use chrono::NaiveDate;
use serde::Serialize;

/// Why a worker disputes the classification of a day.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum JustificationKind {
    ForgotPunch,
    LateEntry,
    EarlyExit,
    JustifiedAbsence,
    MedicalVisit,
    Overtime,
    Other,
    UnjustifiedAbsence,
}

impl JustificationKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JustificationKind::ForgotPunch => "forgot-punch",
            JustificationKind::LateEntry => "late-entry",
            JustificationKind::EarlyExit => "early-exit",
            JustificationKind::JustifiedAbsence => "justified-absence",
            JustificationKind::MedicalVisit => "medical-visit",
            JustificationKind::Overtime => "overtime",
            JustificationKind::Other => "other",
            JustificationKind::UnjustifiedAbsence => "unjustified-absence",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "forgot-punch" => Some(JustificationKind::ForgotPunch),
            "late-entry" => Some(JustificationKind::LateEntry),
            "early-exit" => Some(JustificationKind::EarlyExit),
            "justified-absence" => Some(JustificationKind::JustifiedAbsence),
            "medical-visit" => Some(JustificationKind::MedicalVisit),
            "overtime" => Some(JustificationKind::Overtime),
            "other" => Some(JustificationKind::Other),
            "unjustified-absence" => Some(JustificationKind::UnjustifiedAbsence),
            _ => None,
        }
    }

    /// Kinds that skip human review: approved straight at creation.
    pub fn auto_approves(&self) -> bool {
        matches!(self, JustificationKind::UnjustifiedAbsence)
    }

    /// Forgiving kinds remove an approved day from the ledger recompute:
    /// its contribution becomes zero. Unjustified absences and overtime
    /// keep counting.
    pub fn forgives_day(&self) -> bool {
        !matches!(
            self,
            JustificationKind::UnjustifiedAbsence | JustificationKind::Overtime
        )
    }
}


/// Review state of a justification.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum JustificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl JustificationStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            JustificationStatus::Pending => "pending",
            JustificationStatus::Approved => "approved",
            JustificationStatus::Rejected => "rejected",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JustificationStatus::Pending),
            "approved" => Some(JustificationStatus::Approved),
            "rejected" => Some(JustificationStatus::Rejected),
            _ => None,
        }
    }
}

/// One dispute row. At most one pending justification may exist per
/// (worker, date).
#[derive(Debug, Clone, Serialize)]
pub struct Justification {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate,
    pub kind: JustificationKind,
    pub status: JustificationStatus,
    pub description: String,
    pub attachment: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>, // ISO 8601
    pub created_at: String,          // ISO 8601
}
