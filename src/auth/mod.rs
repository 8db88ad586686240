//! # Global Authentication Gate
//!
//! The decision core: [`evaluator`] is the pure precedence chain that turns
//! a policy snapshot plus a route into an [`AuthDecision`], and [`enforcer`]
//! carries an `Enforce` decision out as a single auth sub-request with
//! fail-closed semantics.

pub mod enforcer;
pub mod evaluator;

pub use enforcer::{
    AuthVerdict, Enforcer, GatewayRequest, GatewayResponse, HttpUpstream, Upstream,
};
pub use evaluator::{decide, AuthDecision};
