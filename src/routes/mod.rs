use std::any::Any;

use axum::{Extension, Router, middleware, response::IntoResponse, response::Response};
use docathome_core::{controller::Controller, error::ApiError};
use socketioxide::layer::SocketIoLayer;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::app::controller::{
    AdminController, AppointmentController, AuthController, DoctorController, LabTestController,
    NurseController, PaymentController, ProfileController,
};
use crate::app::middleware::{
    OriginPolicy, enforce_origin_policy, guard_socket_handshake, parse_json_body,
};
use crate::app::state::AppState;
use crate::config::ALLOWED_ORIGINS;

pub const ORIGIN_POLICY: OriginPolicy = OriginPolicy::new(ALLOWED_ORIGINS);

/// A route group mounted under a fixed prefix.
#[derive(Clone, Copy)]
pub struct RouteGroup {
    pub prefix: &'static str,
    pub router: fn() -> Router,
    pub openapi: fn() -> utoipa::openapi::OpenApi,
}

impl RouteGroup {
    pub const fn of<C: Controller>(prefix: &'static str) -> Self {
        RouteGroup {
            prefix,
            router: C::router,
            openapi: C::openapi,
        }
    }
}

/// Every route group, in mount order. Prefixes must stay disjoint.
pub const ROUTE_GROUPS: [RouteGroup; 8] = [
    RouteGroup::of::<AuthController>("/api/auth"),
    RouteGroup::of::<AdminController>("/api/admin"),
    RouteGroup::of::<DoctorController>("/api/doctors"),
    RouteGroup::of::<NurseController>("/api/nurses"),
    RouteGroup::of::<ProfileController>("/api/profile"),
    RouteGroup::of::<AppointmentController>("/api/appointments"),
    RouteGroup::of::<LabTestController>("/api/lab-tests"),
    RouteGroup::of::<PaymentController>("/api/payment"),
];

/// Composes the gateway: policy and parsing middleware, the socket layer,
/// every route group, the 404 fallback and the panic boundary.
pub fn routes(groups: &[RouteGroup], state: AppState, socket_layer: SocketIoLayer) -> Router {
    let mounted = groups.iter().fold(Router::new(), |router, group| {
        tracing::debug!("mounting {}", group.prefix);
        router.nest(group.prefix, (group.router)())
    });

    // layers run bottom to top: the last one added sees the request first
    mounted
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn(parse_json_body))
        .layer(socket_layer)
        .layer(ORIGIN_POLICY.cors_layer())
        .layer(middleware::from_fn(guard_socket_handshake))
        .layer(middleware::from_fn_with_state(
            ORIGIN_POLICY,
            enforce_origin_policy,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(Extension(state))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mounts_every_route_group() {
        let prefixes: Vec<_> = ROUTE_GROUPS.iter().map(|group| group.prefix).collect();

        assert_eq!(
            prefixes,
            [
                "/api/auth",
                "/api/admin",
                "/api/doctors",
                "/api/nurses",
                "/api/profile",
                "/api/appointments",
                "/api/lab-tests",
                "/api/payment",
            ]
        );
    }

    #[test]
    fn prefixes_are_disjoint() {
        for (i, a) in ROUTE_GROUPS.iter().enumerate() {
            for b in ROUTE_GROUPS.iter().skip(i + 1) {
                let a_under_b = a.prefix.starts_with(&format!("{}/", b.prefix));
                let b_under_a = b.prefix.starts_with(&format!("{}/", a.prefix));

                assert_ne!(a.prefix, b.prefix);
                assert!(!a_under_b && !b_under_a, "{} overlaps {}", a.prefix, b.prefix);
            }
        }
    }

    #[test]
    fn prefixes_do_not_collide_with_the_socket_path() {
        for group in ROUTE_GROUPS {
            assert!(!group.prefix.starts_with(crate::socket::SOCKET_PATH));
        }
    }
}
