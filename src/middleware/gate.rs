use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::config::GateConfig;
use super::cookies;
use super::extractor::resolve_session;
use super::policy;
use super::state::GateState;
use super::traits::IdentityProvider;
use super::types::{GateDecision, SessionResolution};
use crate::assets::is_static_asset;

/// Wrap `router` with the session gate.
///
/// Every request except static assets is checked against the identity
/// provider before it reaches `router`'s handlers.
pub fn protect<P: IdentityProvider>(router: Router, config: GateConfig<P>) -> Router {
    let state = GateState::from(config);
    router.layer(middleware::from_fn_with_state(state, session_gate::<P>))
}

async fn session_gate<P: IdentityProvider>(
    State(state): State<GateState<P>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_static_asset(&path) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    let SessionResolution {
        identity,
        refreshed,
    } = resolve_session(state.provider.as_ref(), &jar).await;

    let authenticated = identity.is_some();
    let class = policy::classify(&path, &state.settings);
    let decision = policy::decide(class, authenticated, &state.settings);

    tracing::debug!(path = %path, ?class, authenticated, ?decision, "Session gate decision");

    match decision {
        GateDecision::Redirect(location) => {
            let redirect = Redirect::to(&location);
            if state.settings.cookies_on_redirect && !refreshed.is_empty() {
                let jar = cookies::apply_refreshed(CookieJar::new(), &refreshed);
                return (jar, redirect).into_response();
            }
            redirect.into_response()
        }
        GateDecision::Forward => {
            cookies::rewrite_request_cookies(request.headers_mut(), &refreshed);
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }

            let response = next.run(request).await;

            if refreshed.is_empty() {
                return response;
            }

            tracing::info!(path = %path, count = refreshed.len(), "Issuing refreshed session cookies");
            let jar = cookies::apply_refreshed(CookieJar::new(), &refreshed);
            (jar, response).into_response()
        }
    }
}
