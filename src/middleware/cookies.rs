use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::CookieConfig;

/// Set once the onboarding wizard was finished on this browser
pub const ONBOARDING_COOKIE: &str = "has_completed_onboarding";
/// Set on login and registration, removed on logout
pub const LOGIN_COOKIE: &str = "is_logged_in";

fn flag_cookie(name: &'static str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, "true"))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub fn onboarding_cookie(config: &CookieConfig) -> Cookie<'static> {
    flag_cookie(ONBOARDING_COOKIE, config.onboarding_max_age_secs, config.secure)
}

pub fn login_cookie(config: &CookieConfig) -> Cookie<'static> {
    flag_cookie(LOGIN_COOKIE, config.login_max_age_secs, config.secure)
}

/// Both gate flags, as set after login or registration
pub fn set_session_cookies(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(onboarding_cookie(config)).add(login_cookie(config))
}

// Emitted even when the request did not carry the cookie
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}

pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.add(removal_cookie(ONBOARDING_COOKIE)).add(removal_cookie(LOGIN_COOKIE))
}
