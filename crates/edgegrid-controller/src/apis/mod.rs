//! Per-entity validation rules and controller aliases.
//!
//! The dependency graph is fixed at construction and acyclic:
//!
//! ```text
//! AppInst ──► App ──► Developer
//!    └──────► Cloudlet ──► Operator
//! ```

pub mod app;
pub mod app_inst;
pub mod cloudlet;
pub mod developer;
pub mod operator;

pub use app::{AppApi, AppRules};
pub use app_inst::{AppInstApi, AppInstRules};
pub use cloudlet::{CloudletApi, CloudletRules};
pub use developer::{DeveloperApi, DeveloperRules};
pub use operator::{OperatorApi, OperatorRules};
