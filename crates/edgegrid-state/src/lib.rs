//! edgegrid-state — the persistent object store consumed by controllers.
//!
//! Objects live under opaque string keys of the form
//! `<TypePrefix>/<structured-key-string>`; values are opaque bytes (the
//! controller stores JSON). [`ObjStore`] is the contract; [`RedbObjStore`]
//! is the embedded implementation backed by [redb](https://docs.rs/redb).
//!
//! Create is create-only, update and delete require the key to exist, and
//! point reads report a missing key as [`StoreError::KeyNotFound`]. Those
//! distinguished conditions are what the controller's sync protocol is
//! built on.

pub mod error;
pub mod store;
pub mod tables;

pub use error::{StoreError, StoreResult};
pub use store::{ObjStore, RedbObjStore};
