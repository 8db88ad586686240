//! Per-request gateway façade
//!
//! Wires the route registry, policy store and enforcer into the single
//! entry point the surrounding proxy calls per request: resolve the route,
//! snapshot the policy, decide, enforce. Each request is handled
//! independently over immutable snapshots; configuration updates apply to
//! subsequent requests only.

use std::sync::Arc;

use http::StatusCode;
use metrics::counter;
use reqwest::Client;
use tracing::{debug, info_span, Instrument};

use crate::auth::{decide, Enforcer, GatewayRequest, GatewayResponse, HttpUpstream};
use crate::config::PolicyStore;
use crate::domain::RouteRegistry;
use crate::errors::Result;

/// Global auth gate over a set of configured routes.
pub struct Gateway {
    routes: Arc<RouteRegistry>,
    policy: Arc<PolicyStore>,
    enforcer: Enforcer,
    client: Client,
}

impl Gateway {
    pub fn new(routes: Arc<RouteRegistry>, policy: Arc<PolicyStore>, enforcer: Enforcer) -> Self {
        Self {
            routes,
            policy,
            enforcer,
            client: Client::new(),
        }
    }

    /// Handle one inbound request end to end.
    ///
    /// Routes with no match get a terminal 404. Otherwise the request flows
    /// through the decision chain and, when enforcement applies, the auth
    /// sub-request; denial short-circuits with the auth status, anything
    /// else is forwarded to the route's upstream.
    pub async fn handle(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        let span = info_span!(
            "gateway_request",
            method = %request.method,
            host = %request.host,
            path = %request.path,
            decision = tracing::field::Empty,
        );

        async {
            let Some(route) = self.routes.resolve(&request.host, &request.path) else {
                debug!("No route matched; returning 404");
                counter!("authgate_requests_total", "outcome" => "no_route").increment(1);
                return Ok(GatewayResponse::denied(StatusCode::NOT_FOUND));
            };

            let policy = self.policy.snapshot();
            let decision = decide(&policy, &route, &request.path);

            let decision_label = if decision.is_enforced() {
                "enforce"
            } else {
                "skip"
            };
            tracing::Span::current().record("decision", decision_label);
            counter!("authgate_decisions_total", "decision" => decision_label).increment(1);

            let upstream = HttpUpstream::new(self.client.clone(), route.upstream.clone());
            self.enforcer.enforce(decision, request, &upstream).await
        }
        .instrument(span)
        .await
    }
}
