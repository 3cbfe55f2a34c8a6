//! Aria Core - session state and data model
//!
//! Owns the console's client-side state: the message log, mode catalog,
//! integration descriptors, and the session controller that orchestrates
//! gateway calls with single-in-flight cancellation.

#![forbid(unsafe_code)]

pub mod error;
pub mod integration;
pub mod message;
pub mod mode;
pub mod session;

pub use error::{Error, Result};
pub use integration::{Integration, IntegrationStatus};
pub use message::{Message, Role};
pub use mode::{Capability, Mode};
pub use session::{SessionController, SessionSnapshot, SubmitOutcome};
