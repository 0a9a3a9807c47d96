//! Session store and recent-query log
//!
//! The only cross-request state in the system. Both structures are
//! constructed once at process start and injected into every handler;
//! there are no ambient globals. Everything here is in-memory and
//! last-writer-wins: sessions are lost on restart by design.

pub mod queries;
pub mod session;

pub use queries::{QueryLog, QueryRecord};
pub use session::{SessionSnapshot, SessionStore};
