use clap::{Parser, Subcommand};

/// Command-line interface definition for Timebank
/// CLI front-end for the time-and-attendance engine backed by SQLite
#[derive(Parser)]
#[command(
    name = "timebank",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track clock events, classify work days and keep per-worker hour banks",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Register a worker
    WorkerAdd {
        /// Worker name (must be unique)
        name: String,

        #[arg(long = "approver", help = "Grant the approval capability")]
        approver: bool,

        #[arg(
            long = "default-schedule",
            help = "Seed a Mon-Fri schedule from the configured defaults"
        )]
        default_schedule: bool,

        /// Backdate the registration (YYYY-MM-DD); used by migrations of
        /// historical data
        #[arg(long = "since", hide = true)]
        since: Option<String>,
    },

    /// List registered workers
    Workers,

    /// Set or clear one weekday of a worker's schedule template
    Schedule {
        /// Worker id or name
        worker: String,

        #[arg(long = "day", help = "Weekday: mon, tue, wed, thu, fri, sat, sun")]
        day: String,

        #[arg(long = "hours", help = "Expected work hours for that weekday")]
        hours: Option<f64>,

        #[arg(long = "entry", help = "Expected entry time (HH:MM)")]
        entry: Option<String>,

        #[arg(long = "exit", help = "Expected exit time (HH:MM)")]
        exit: Option<String>,

        #[arg(long = "break", help = "Minimum break minutes")]
        break_minutes: Option<i64>,

        #[arg(long = "clear", help = "Remove the slot (no schedule that weekday)")]
        clear: bool,
    },

    /// Record a self-punch for "now" (alternates clock-in/clock-out)
    Punch {
        /// Worker id or name
        worker: String,
    },

    /// Record a manual punch at a past timestamp (requires review unless
    /// the acting worker is an approver)
    Manual {
        /// Worker id or name the punch belongs to
        worker: String,

        /// Date of the punch (YYYY-MM-DD)
        date: String,

        /// Time of the punch (HH:MM)
        time: String,

        /// Punch kind: in | out
        kind: String,

        #[arg(long = "note", help = "Mandatory note explaining the manual entry")]
        note: String,

        #[arg(long = "as", help = "Acting worker id or name (defaults to the target)")]
        acting: Option<String>,

        #[arg(long = "attachment", help = "File to attach as supporting evidence")]
        attachment: Option<String>,
    },

    /// Approve a pending manual punch
    PunchApprove {
        /// Event id
        id: i64,

        #[arg(long = "as", help = "Acting approver id or name")]
        acting: String,
    },

    /// Reject a pending manual punch
    PunchReject {
        /// Event id
        id: i64,

        #[arg(long = "as", help = "Acting approver id or name")]
        acting: String,

        #[arg(long = "reason")]
        reason: Option<String>,
    },

    /// Show today's events, divergence and bank balance for a worker
    Today {
        /// Worker id or name
        worker: String,

        #[arg(long = "json", help = "Emit machine-readable JSON")]
        json: bool,
    },

    /// Monthly report for a worker
    Report {
        /// Worker id or name
        worker: String,

        /// Month to report (YYYY-MM)
        month: String,

        #[arg(long = "json", help = "Emit machine-readable JSON")]
        json: bool,
    },

    /// File a justification against a divergent day
    Justify {
        /// Worker id or name
        worker: String,

        /// Disputed date (YYYY-MM-DD)
        date: String,

        /// Type: forgot-punch, late-entry, early-exit, justified-absence,
        /// medical-visit, overtime, other, unjustified-absence
        kind: String,

        #[arg(long = "description")]
        description: Option<String>,

        #[arg(long = "attachment", help = "File to attach as supporting evidence")]
        attachment: Option<String>,
    },

    /// Approve a pending justification
    JustifyApprove {
        /// Justification id
        id: i64,

        #[arg(long = "as", help = "Acting approver id or name")]
        acting: String,
    },

    /// Reject a pending justification
    JustifyReject {
        /// Justification id
        id: i64,

        #[arg(long = "as", help = "Acting approver id or name")]
        acting: String,

        #[arg(long = "reason")]
        reason: Option<String>,
    },

    /// Show, close or recompute a worker's hour bank
    Bank {
        /// Worker id or name
        worker: String,

        #[arg(long = "close", help = "Settle the balance and restart the bank")]
        close: bool,

        #[arg(long = "recompute", help = "Rebuild the balance from raw events")]
        recompute: bool,

        #[arg(long = "as", help = "Acting approver (required by --close)")]
        acting: Option<String>,
    },

    /// Print rows from the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
