use std::sync::Arc;

use actix_web::{
    body::BoxBody,
    cookie::Cookie,
    http::{header, StatusCode},
    HttpRequest, HttpResponse, Responder,
};
use tracing::*;

use crate::session::{Identity, SessionCodec, SESSION_COOKIE};

use super::{CredentialVerifier, FixedCredentials};

/// Page everyone can reach, where the login form lives.
pub const PUBLIC_PAGE: &str = "/";
/// Page that requires a valid session.
pub const PANEL_PAGE: &str = "/panel";

/// Outcome of a login or logout: where the browser goes next, and the
/// cookie to set on the way.
#[derive(Debug)]
pub struct Redirect {
    pub target: &'static str,
    pub cookie: Option<Cookie<'static>>,
}

impl Redirect {
    fn to(target: &'static str) -> Self {
        Self {
            target,
            cookie: None,
        }
    }

    fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookie = Some(cookie);
        self
    }
}

impl Responder for Redirect {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(StatusCode::FOUND);
        response.insert_header((header::LOCATION, self.target));

        if let Some(cookie) = self.cookie {
            response.cookie(cookie);
        }

        response.finish()
    }
}

/// Session based access control for the panel.
///
/// The gate never stores sessions, the cookie is the only state. Logging out
/// only asks the browser to forget the cookie: a copied token keeps decoding
/// until the process restarts with new keys.
#[derive(Clone)]
pub struct AuthGate {
    codec: SessionCodec,
    verifier: Arc<dyn CredentialVerifier>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(codec: SessionCodec, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { codec, verifier }
    }

    pub fn with_fixed_credentials(codec: SessionCodec) -> Self {
        Self::new(codec, Arc::new(FixedCredentials::default()))
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    #[instrument(level = "debug", skip(self, password))]
    pub fn login(&self, name: &str, password: &str) -> Redirect {
        if !self.verifier.verify(name, password) {
            info!("Login rejected");
            return Redirect::to(PUBLIC_PAGE);
        }

        let token = match self.codec.encode(&Identity::new(name)) {
            Ok(token) => token,
            Err(error) => {
                error!("Failed to encode session: {error}");
                return Redirect::to(PUBLIC_PAGE);
            }
        };

        info!("Login accepted");
        Redirect::to(PANEL_PAGE).with_cookie(session_cookie(token))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn logout(&self) -> Redirect {
        let mut cookie = session_cookie(String::new());
        cookie.make_removal();

        Redirect::to(PUBLIC_PAGE).with_cookie(cookie)
    }

    /// Name carried by the request's session cookie, empty when there is no
    /// cookie or it does not decode.
    pub fn resolve_identity(&self, request: &HttpRequest) -> String {
        let Some(cookie) = request.cookie(SESSION_COOKIE) else {
            return String::new();
        };

        match self.codec.decode(cookie.value()) {
            Ok(identity) => identity.name,
            Err(error) => {
                debug!("Ignoring session cookie: {error}");
                String::new()
            }
        }
    }
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .finish()
}
