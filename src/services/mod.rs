pub mod match_service;
pub mod notification_service;
pub mod run_lock;
pub mod run_service;
pub mod scheduler;

pub use match_service::{MatchReport, MatchService, SourceFailure};
pub use notification_service::{MailTransport, NotificationService, OutgoingMail, SmtpMailTransport};
pub use run_lock::RunLock;
pub use run_service::{RunService, RunSummary};
pub use scheduler::DailyScheduler;
