//! Entity types tracked by the edgegrid controller.
//!
//! Keys nest their parents' keys: an application instance is addressed by
//! its application (itself scoped to a developer) and the cloudlet hosting
//! it (itself scoped to an operator), plus a numeric instance id.

use serde::{Deserialize, Serialize};

use crate::object::{Matches, ObjKey, ObjType, Object, field_matches, segment};

// ── Location ──────────────────────────────────────────────────────

/// Wall-clock instant attached to a location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// Geographic location of a cloudlet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Loc {
    pub latitude: f64,
    pub longitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub altitude: f64,
    pub course: f64,
    pub speed: f64,
    pub timestamp: Option<Timestamp>,
}

impl Matches for Loc {
    fn matches(&self, filter: &Self) -> bool {
        field_matches(&self.latitude, &filter.latitude)
            && field_matches(&self.longitude, &filter.longitude)
            && field_matches(&self.horizontal_accuracy, &filter.horizontal_accuracy)
            && field_matches(&self.vertical_accuracy, &filter.vertical_accuracy)
            && field_matches(&self.altitude, &filter.altitude)
            && field_matches(&self.course, &filter.course)
            && field_matches(&self.speed, &filter.speed)
            && field_matches(&self.timestamp, &filter.timestamp)
    }
}

// ── Developer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeveloperKey {
    pub name: String,
}

impl ObjKey for DeveloperKey {
    fn key_string(&self) -> String {
        segment(&self.name)
    }
}

impl Matches for DeveloperKey {
    fn matches(&self, filter: &Self) -> bool {
        field_matches(&self.name, &filter.name)
    }
}

/// An organization that publishes applications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Developer {
    pub key: DeveloperKey,
    pub username: String,
    pub passhash: String,
    pub address: String,
    pub email: String,
}

impl Matches for Developer {
    fn matches(&self, filter: &Self) -> bool {
        self.key.matches(&filter.key)
            && field_matches(&self.username, &filter.username)
            && field_matches(&self.passhash, &filter.passhash)
            && field_matches(&self.address, &filter.address)
            && field_matches(&self.email, &filter.email)
    }
}

impl Object for Developer {
    type Key = DeveloperKey;
    const TYPE: ObjType = ObjType::Developer;

    fn key(&self) -> &DeveloperKey {
        &self.key
    }
}

// ── Operator ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorKey {
    pub name: String,
}

impl ObjKey for OperatorKey {
    fn key_string(&self) -> String {
        segment(&self.name)
    }
}

impl Matches for OperatorKey {
    fn matches(&self, filter: &Self) -> bool {
        field_matches(&self.name, &filter.name)
    }
}

/// An organization that runs cloudlets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operator {
    pub key: OperatorKey,
}

impl Matches for Operator {
    fn matches(&self, filter: &Self) -> bool {
        self.key.matches(&filter.key)
    }
}

impl Object for Operator {
    type Key = OperatorKey;
    const TYPE: ObjType = ObjType::Operator;

    fn key(&self) -> &OperatorKey {
        &self.key
    }
}

// ── Cloudlet ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudletKey {
    pub operator_key: OperatorKey,
    pub name: String,
}

impl ObjKey for CloudletKey {
    fn key_string(&self) -> String {
        format!("{}/{}", self.operator_key.key_string(), segment(&self.name))
    }
}

impl Matches for CloudletKey {
    fn matches(&self, filter: &Self) -> bool {
        self.operator_key.matches(&filter.operator_key) && field_matches(&self.name, &filter.name)
    }
}

/// A compute site at the network edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cloudlet {
    pub key: CloudletKey,
    /// Management address of the site; may be empty.
    pub access_ip: String,
    pub location: Loc,
}

impl Matches for Cloudlet {
    fn matches(&self, filter: &Self) -> bool {
        self.key.matches(&filter.key)
            && field_matches(&self.access_ip, &filter.access_ip)
            && self.location.matches(&filter.location)
    }
}

impl Object for Cloudlet {
    type Key = CloudletKey;
    const TYPE: ObjType = ObjType::Cloudlet;

    fn key(&self) -> &CloudletKey {
        &self.key
    }
}

// ── App ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppKey {
    pub developer_key: DeveloperKey,
    pub name: String,
    pub version: String,
}

impl ObjKey for AppKey {
    fn key_string(&self) -> String {
        format!(
            "{}/{}/{}",
            self.developer_key.key_string(),
            segment(&self.name),
            segment(&self.version)
        )
    }
}

impl Matches for AppKey {
    fn matches(&self, filter: &Self) -> bool {
        self.developer_key.matches(&filter.developer_key)
            && field_matches(&self.name, &filter.name)
            && field_matches(&self.version, &filter.version)
    }
}

/// Image format of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    #[default]
    Unknown,
    Docker,
    Qcow,
}

/// Network layer at which an application is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLayer {
    #[default]
    Unknown,
    L4,
    L7,
    L4L7,
}

/// A deployable application published by a developer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub key: AppKey,
    pub image_type: ImageType,
    pub image_path: String,
    pub access_layer: AccessLayer,
}

impl Matches for App {
    fn matches(&self, filter: &Self) -> bool {
        self.key.matches(&filter.key)
            && field_matches(&self.image_type, &filter.image_type)
            && field_matches(&self.image_path, &filter.image_path)
            && field_matches(&self.access_layer, &filter.access_layer)
    }
}

impl Object for App {
    type Key = AppKey;
    const TYPE: ObjType = ObjType::App;

    fn key(&self) -> &AppKey {
        &self.key
    }
}

// ── AppInst ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInstKey {
    pub app_key: AppKey,
    pub cloudlet_key: CloudletKey,
    pub id: u64,
}

impl ObjKey for AppInstKey {
    fn key_string(&self) -> String {
        format!(
            "{}/{}/{}",
            self.app_key.key_string(),
            self.cloudlet_key.key_string(),
            self.id
        )
    }
}

impl Matches for AppInstKey {
    fn matches(&self, filter: &Self) -> bool {
        self.app_key.matches(&filter.app_key)
            && self.cloudlet_key.matches(&filter.cloudlet_key)
            && field_matches(&self.id, &filter.id)
    }
}

/// How an application instance came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    #[default]
    Unknown,
    /// Created on demand by the platform.
    Dynamic,
    /// Provisioned explicitly by an operator.
    Static,
}

/// A running instance of an application on a cloudlet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInst {
    pub key: AppInstKey,
    /// Location of the hosting cloudlet, copied at creation and never
    /// refreshed afterwards.
    pub cloudlet_loc: Loc,
    pub uri: String,
    pub liveness: Liveness,
    pub ip: String,
}

impl Matches for AppInst {
    fn matches(&self, filter: &Self) -> bool {
        self.key.matches(&filter.key)
            && self.cloudlet_loc.matches(&filter.cloudlet_loc)
            && field_matches(&self.uri, &filter.uri)
            && field_matches(&self.liveness, &filter.liveness)
            && field_matches(&self.ip, &filter.ip)
    }
}

impl Object for AppInst {
    type Key = AppInstKey;
    const TYPE: ObjType = ObjType::AppInst;

    fn key(&self) -> &AppInstKey {
        &self.key
    }
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpResult {
    pub message: String,
}

impl OpResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::store_key;

    fn video_inst(site: &str, id: u64) -> AppInst {
        AppInst {
            key: AppInstKey {
                app_key: AppKey {
                    developer_key: DeveloperKey {
                        name: "acme".to_string(),
                    },
                    name: "video".to_string(),
                    version: "1.0".to_string(),
                },
                cloudlet_key: CloudletKey {
                    operator_key: OperatorKey {
                        name: "opA".to_string(),
                    },
                    name: site.to_string(),
                },
                id,
            },
            liveness: Liveness::Static,
            ip: "10.0.0.5".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn app_inst_store_key_is_hierarchical() {
        let inst = video_inst("site1", 7);
        assert_eq!(
            store_key::<AppInst>(&inst.key),
            "AppInst/acme/video/1.0/opA/site1/7"
        );
    }

    #[test]
    fn key_string_escapes_embedded_slashes() {
        let key = CloudletKey {
            operator_key: OperatorKey {
                name: "op/a".to_string(),
            },
            name: "s".to_string(),
        };
        assert_eq!(key.key_string(), "op%2Fa/s");
    }

    #[test]
    fn empty_filter_matches_everything() {
        let inst = video_inst("site1", 7);
        assert!(inst.matches(&AppInst::default()));
    }

    #[test]
    fn site_only_filter_selects_by_cloudlet() {
        let mut filter = AppInst::default();
        filter.key.cloudlet_key.name = "site1".to_string();

        assert!(video_inst("site1", 1).matches(&filter));
        assert!(!video_inst("site2", 1).matches(&filter));
    }

    #[test]
    fn enum_filter_field_must_equal() {
        let mut filter = AppInst::default();
        filter.liveness = Liveness::Dynamic;
        assert!(!video_inst("site1", 1).matches(&filter));

        filter.liveness = Liveness::Static;
        assert!(video_inst("site1", 1).matches(&filter));
    }

    #[test]
    fn unset_key_detection() {
        assert!(AppInstKey::default().is_unset());
        assert!(!video_inst("site1", 1).key.is_unset());
    }

    #[test]
    fn partial_json_filter_deserializes() {
        let filter: AppInst =
            serde_json::from_str(r#"{"key":{"cloudlet_key":{"name":"site1"}}}"#).unwrap();
        assert_eq!(filter.key.cloudlet_key.name, "site1");
        assert_eq!(filter.liveness, Liveness::Unknown);
    }
}
