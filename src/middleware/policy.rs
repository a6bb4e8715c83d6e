use super::config::GateSettings;
use super::types::{GateDecision, RouteClass};

/// Classify a request path. Pure function of the path and settings.
///
/// Protected prefixes win over the sign-in and home paths, so a
/// misconfiguration that protects `/auth` still fails closed.
pub(crate) fn classify(path: &str, settings: &GateSettings) -> RouteClass {
    if settings
        .protected_prefixes
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
    {
        RouteClass::Protected
    } else if path == settings.sign_in_path {
        RouteClass::SignIn
    } else if path == settings.home_path {
        RouteClass::Home
    } else {
        RouteClass::Other
    }
}

/// Apply the redirect policy.
pub(crate) fn decide(class: RouteClass, authenticated: bool, settings: &GateSettings) -> GateDecision {
    match (class, authenticated) {
        (RouteClass::Protected, false) => GateDecision::Redirect(settings.sign_in_path.clone()),
        (RouteClass::SignIn | RouteClass::Home, true) => {
            GateDecision::Redirect(settings.landing_path.clone())
        }
        _ => GateDecision::Forward,
    }
}

// `/dashboard` matches `/dashboard` and `/dashboard/...` only.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
