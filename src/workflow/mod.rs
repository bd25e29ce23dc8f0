//! End-to-end workflows.
//!
//! Both entry points produce a [`PreparedJob`]: [`InteractiveSession`] by
//! asking questions on a terminal, [`JobSpec`] by reading a TOML or JSON
//! job file.

pub mod job;
pub mod session;

pub use job::{JobSpec, PreparedJob};
pub use session::InteractiveSession;
