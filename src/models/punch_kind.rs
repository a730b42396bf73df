use serde::Serialize;

/// Direction of a clock event: `In` is a clock-in, `Out` a clock-out.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PunchKind {
    In,
    Out,
}

impl PunchKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::In => "in",
            PunchKind::Out => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(PunchKind::In),
            "out" => Some(PunchKind::Out),
            _ => None,
        }
    }

    /// Parse user input (case-insensitive).
    pub fn from_input(s: &str) -> Option<Self> {
        Self::from_db_str(s.to_lowercase().as_str())
    }

    pub fn is_in(&self) -> bool {
        matches!(self, PunchKind::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, PunchKind::Out)
    }

    /// The kind a new self-punch should take after this one.
    pub fn opposite(&self) -> Self {
        match self {
            PunchKind::In => PunchKind::Out,
            PunchKind::Out => PunchKind::In,
        }
    }
}
