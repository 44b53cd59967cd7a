// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static route table.
//!
//! Every endpoint is described once by a [`RouteDescriptor`]: method, path,
//! the gates that guard it and the handler. Descriptors are grouped per
//! [`Controller`] and turned into an axum router by [`register`] at startup.
//! Nothing is added after that.

use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};

use crate::auth::middleware::{
    attach_profile, authenticate, require_admin, require_guest, require_user,
};
use crate::state::AppState;

/// Request gate applied in front of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Authenticate,
    RequireAdmin,
    RequireUser,
    RequireGuest,
    AttachProfile,
}

impl Gate {
    fn apply(self, endpoint: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
        match self {
            Gate::Authenticate => {
                endpoint.route_layer(from_fn_with_state(state.clone(), authenticate))
            }
            Gate::RequireAdmin => endpoint.route_layer(from_fn(require_admin)),
            Gate::RequireUser => endpoint.route_layer(from_fn(require_user)),
            Gate::RequireGuest => endpoint.route_layer(from_fn(require_guest)),
            Gate::AttachProfile => {
                endpoint.route_layer(from_fn_with_state(state.clone(), attach_profile))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RouteMethod {
    pub fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Patch => MethodFilter::PATCH,
            RouteMethod::Delete => MethodFilter::DELETE,
        }
    }
}

/// One endpoint: `method path`, guarded by `gates` in the listed order.
pub struct RouteDescriptor {
    pub method: RouteMethod,
    pub path: &'static str,
    pub gates: &'static [Gate],
    pub endpoint: MethodRouter<AppState>,
}

impl RouteDescriptor {
    pub fn new<H, T>(
        method: RouteMethod,
        path: &'static str,
        gates: &'static [Gate],
        handler: H,
    ) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method,
            path,
            gates,
            endpoint: on(method.filter(), handler),
        }
    }
}

/// Routes sharing a base path.
pub struct Controller {
    pub base_path: &'static str,
    pub routes: Vec<RouteDescriptor>,
}

impl Controller {
    pub fn new(base_path: &'static str, routes: Vec<RouteDescriptor>) -> Self {
        Self { base_path, routes }
    }
}

/// Join a controller base path and a route path.
pub fn full_path(base_path: &str, path: &str) -> String {
    let joined = format!("{}{}", base_path.trim_end_matches('/'), path);
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Build the router for `controllers`.
///
/// Gates are layered innermost-last so the first listed gate runs first.
/// `route_layer` keeps unmatched paths out of the gates, so an unknown URL
/// is a plain 404 rather than a 401.
pub fn register(state: &AppState, controllers: Vec<Controller>) -> Router<AppState> {
    let mut router = Router::new();
    for controller in controllers {
        for route in controller.routes {
            let path = full_path(controller.base_path, route.path);
            let endpoint = route
                .gates
                .iter()
                .rev()
                .fold(route.endpoint, |endpoint, gate| gate.apply(endpoint, state));

            tracing::debug!(
                method = ?route.method,
                %path,
                gates = ?route.gates,
                "route registered"
            );
            router = router.route(&path, endpoint);
        }
    }
    router
}
