//! edgegrid-notify — asynchronous "key changed" notices.
//!
//! A [`NotifyBus`] is one broadcast topic. The controller uses two of them:
//!
//! ```text
//! replica A                        replica B
//!   mutation ──publish──► peer bus ──► listener ──► refresh(key)
//!                                                     │
//!                               downstream bus ◄──publish
//!                                     │
//!                                   agents
//! ```
//!
//! Notices are invalidation hints only. Receivers always re-read the store,
//! so duplicate or reordered delivery is harmless.

pub mod bus;
pub mod error;
pub mod listener;

pub use bus::{Notice, NotifyBus, Publisher};
pub use error::{NotifyError, NotifyResult};
pub use listener::{NoticeHandler, spawn_listener};
