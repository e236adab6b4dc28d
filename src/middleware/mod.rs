pub mod cookies;
pub mod route_gate;

pub use cookies::{clear_session_cookies, set_session_cookies, LOGIN_COOKIE, ONBOARDING_COOKIE};
pub use route_gate::{applies_to, decide, route_gate_middleware, GateDecision, RouteGateCookies};
