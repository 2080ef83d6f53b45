//! Object and key traits shared by every entity type.

use std::fmt;
use std::hash::Hash;
use std::net::IpAddr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Entity type tag. Doubles as the store namespace prefix and the
/// notification topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjType {
    Developer,
    Operator,
    Cloudlet,
    App,
    AppInst,
}

impl ObjType {
    /// Store namespace prefix for this type.
    pub fn prefix(&self) -> &'static str {
        match self {
            ObjType::Developer => "Developer",
            ObjType::Operator => "Operator",
            ObjType::Cloudlet => "Cloudlet",
            ObjType::App => "App",
            ObjType::AppInst => "AppInst",
        }
    }
}

impl fmt::Display for ObjType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Partial-object matching used by `show`.
///
/// A filter matches when every field it sets (non-default) equals the
/// corresponding field of the candidate. Default-valued filter fields are
/// wildcards.
pub trait Matches {
    fn matches(&self, filter: &Self) -> bool;
}

/// Compare one leaf field against the filter, treating the default value
/// as a wildcard.
pub fn field_matches<T: PartialEq + Default>(value: &T, filter: &T) -> bool {
    *filter == T::default() || value == filter
}

/// Composite key of an entity.
pub trait ObjKey:
    Clone
    + Eq
    + Hash
    + fmt::Debug
    + Default
    + Serialize
    + DeserializeOwned
    + Matches
    + Send
    + Sync
    + 'static
{
    /// Hierarchical encoding of the key, without the type prefix.
    fn key_string(&self) -> String;

    /// True when no field of the key has been set.
    fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

/// An entity stored and cached by a controller.
pub trait Object:
    Clone
    + fmt::Debug
    + PartialEq
    + Default
    + Serialize
    + DeserializeOwned
    + Matches
    + Send
    + Sync
    + 'static
{
    type Key: ObjKey;

    const TYPE: ObjType;

    fn key(&self) -> &Self::Key;
}

/// Full store key: `<TypePrefix>/<key-string>`.
pub fn store_key<T: Object>(key: &T::Key) -> String {
    format!("{}/{}", T::TYPE.prefix(), key.key_string())
}

/// Prefix under which every object of `ty` is stored.
pub fn load_prefix(ty: ObjType) -> String {
    format!("{}/", ty.prefix())
}

/// Escape one key segment so that `/` only ever separates segments.
pub(crate) fn segment(raw: &str) -> String {
    raw.replace('%', "%25").replace('/', "%2F")
}

/// True if `addr` parses as an IPv4 or IPv6 address.
pub fn valid_ip(addr: &str) -> bool {
    addr.parse::<IpAddr>().is_ok()
}
