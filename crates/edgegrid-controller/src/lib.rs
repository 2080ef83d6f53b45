//! edgegrid-controller — object-cache controllers for the edgegrid plane.
//!
//! One generic [`ObjApi`] per entity type keeps an in-memory mirror of the
//! store, validates mutations against its parents' caches, and stays
//! current across replicas through the notification bus.
//!
//! # Architecture
//!
//! ```text
//! request ──► ObjApi::create/update/delete
//!               ├── Validator chain (parent caches, read locks)
//!               ├── StoreSync write (outside the cache lock)
//!               ├── ObjApi::refresh (store read + map update under lock)
//!               │      └── downstream notice
//!               └── peer notice
//!
//! peer notice ──► Controller::handle_notice ──► ObjApi::refresh
//! ```

pub mod apis;
pub mod cache;
pub mod controller;
pub mod error;
pub mod sync;
pub mod validate;

#[cfg(test)]
mod testutil;

pub use apis::*;
pub use cache::{Notifiers, ObjApi};
pub use controller::Controller;
pub use error::{ControllerError, ControllerResult, ValidationError};
pub use sync::StoreSync;
pub use validate::Validator;
