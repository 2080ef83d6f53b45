//! edgegrid-api — REST API for the edgegrid object layer.
//!
//! Every entity type gets the same four routes, served by generic handlers
//! over its [`ObjApi`](edgegrid_controller::ObjApi).
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/api/v1/{kind}` | Create an object |
//! | PUT | `/api/v1/{kind}` | Update an object |
//! | DELETE | `/api/v1/{kind}` | Delete the object named by the body's key |
//! | POST | `/api/v1/{kind}/show` | List cached objects matching a partial object |
//! | GET | `/healthz` | Liveness probe |
//!
//! `{kind}` is one of `developers`, `operators`, `cloudlets`, `apps`,
//! `appinsts`.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use edgegrid_controller::{Controller, ObjApi, Validator};
use edgegrid_core::{ObjType, Object};

/// URL segment serving `ty`.
pub fn route_name(ty: ObjType) -> &'static str {
    match ty {
        ObjType::Developer => "developers",
        ObjType::Operator => "operators",
        ObjType::Cloudlet => "cloudlets",
        ObjType::App => "apps",
        ObjType::AppInst => "appinsts",
    }
}

/// Build the complete API router.
pub fn build_router(ctrl: Arc<Controller>) -> Router {
    let api_routes = Router::new()
        .merge(object_routes(Arc::clone(&ctrl.developers)))
        .merge(object_routes(Arc::clone(&ctrl.operators)))
        .merge(object_routes(Arc::clone(&ctrl.cloudlets)))
        .merge(object_routes(Arc::clone(&ctrl.apps)))
        .merge(object_routes(Arc::clone(&ctrl.app_insts)));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}

fn object_routes<T: Object, V: Validator<T>>(api: Arc<ObjApi<T, V>>) -> Router {
    let base = format!("/{}", route_name(T::TYPE));
    Router::new()
        .route(
            &base,
            post(handlers::create::<T, V>)
                .put(handlers::update::<T, V>)
                .delete(handlers::delete::<T, V>),
        )
        .route(&format!("{base}/show"), post(handlers::show::<T, V>))
        .with_state(api)
}
