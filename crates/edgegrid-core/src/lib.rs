//! edgegrid-core — shared types for the edgegrid object-state layer.
//!
//! Every entity the controller tracks is an [`Object`] addressed by an
//! [`ObjKey`]. Keys are nested tuples of their parents' keys and encode to
//! a hierarchical store path (`<TypePrefix>/<parent>/.../<leaf>`).

pub mod config;
pub mod object;
pub mod types;

pub use config::GridConfig;
pub use object::{
    Matches, ObjKey, ObjType, Object, field_matches, load_prefix, store_key, valid_ip,
};
pub use types::*;
