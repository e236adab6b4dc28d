use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::cookies::{LOGIN_COOKIE, ONBOARDING_COOKIE};

/// The two independent gate flags carried by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteGateCookies {
    pub onboarding_completed: bool,
    pub is_logged_in: bool,
}

impl RouteGateCookies {
    pub fn new(onboarding_completed: bool, is_logged_in: bool) -> Self {
        Self { onboarding_completed, is_logged_in }
    }

    pub fn from_jar(jar: &CookieJar) -> Self {
        let flag = |name: &str| jar.get(name).is_some_and(|cookie| is_set(cookie.value()));
        Self {
            onboarding_completed: flag(ONBOARDING_COOKIE),
            is_logged_in: flag(LOGIN_COOKIE),
        }
    }
}

// Presence counts, unless the value explicitly says otherwise
fn is_set(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathClass {
    Root,
    Onboarding,
    /// `/login*` and `/onboarding/*`, reachable without any cookie
    Open,
    Protected,
}

fn classify(path: &str) -> PathClass {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    match path {
        "/" => PathClass::Root,
        "/onboarding" => PathClass::Onboarding,
        p if p.starts_with("/login") || p.starts_with("/onboarding") => PathClass::Open,
        _ => PathClass::Protected,
    }
}

/// Redirect decision for a page request; first matching row wins
pub fn decide(path: &str, cookies: RouteGateCookies) -> GateDecision {
    match (classify(path), cookies.onboarding_completed, cookies.is_logged_in) {
        (PathClass::Root, false, _) => GateDecision::Redirect("/onboarding"),
        (PathClass::Onboarding, true, _) => GateDecision::Redirect("/"),
        (PathClass::Root | PathClass::Protected, _, false) => GateDecision::Redirect("/login"),
        _ => GateDecision::Allow,
    }
}

/// Whether the gate looks at `path` at all; API calls, framework internals and assets pass through
pub fn applies_to(path: &str) -> bool {
    const SKIPPED_PREFIXES: [&str; 4] = ["/api", "/_next", "/_vercel", "/_static"];
    if SKIPPED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return false;
    }
    !path.contains('.')
}

pub async fn route_gate_middleware(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !applies_to(&path) {
        return next.run(request).await;
    }

    match decide(&path, RouteGateCookies::from_jar(&jar)) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!(path = %path, target, "route gate redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
