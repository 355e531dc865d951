//! In-memory workflow adapters.

mod mailer;
mod repository;

pub use mailer::RecordingMailer;
pub use repository::InMemoryWorkflowRepository;
