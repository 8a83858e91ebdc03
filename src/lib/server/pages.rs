use actix_files::NamedFile;
use actix_web::{
    http::header,
    rt,
    web::{self, Form},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;
use tracing::*;

use crate::{
    auth::{AuthGate, Redirect, PUBLIC_PAGE},
    metrics::{ProcMeminfo, SysinfoCpu},
    server::error::{Error, Result},
    stream::{self, CpuProducer, MemoryProducer},
};

use super::ServerConfig;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginForm {
    /// Fields from the request body win, the query string fills the gaps.
    pub fn merged(body: Self, query: Self) -> Self {
        Self {
            name: body.name.or(query.name),
            password: body.password.or(query.password),
        }
    }
}

/// Login page, public
pub async fn index(config: web::Data<ServerConfig>) -> Result<NamedFile> {
    info!("Request for login page received");
    Ok(NamedFile::open_async(config.page("login.html")).await?)
}

/// Control panel, only for requests carrying a valid session
pub async fn panel(
    req: HttpRequest,
    gate: web::Data<AuthGate>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse> {
    let name = gate.resolve_identity(&req);
    if name.is_empty() {
        debug!("No session, redirecting to the login page");
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, PUBLIC_PAGE))
            .finish());
    }

    debug!("Serving panel to {name:?}");
    let page = NamedFile::open_async(config.page("panel.html")).await?;
    Ok(page.into_response(&req))
}

/// Credentials come from the urlencoded body or the query string. A body
/// that can't be parsed counts as empty, which ends as a failed login.
pub async fn login(
    req: HttpRequest,
    gate: web::Data<AuthGate>,
    body: Option<Form<LoginForm>>,
) -> Redirect {
    let body = body.map(Form::into_inner).unwrap_or_default();
    let query = web::Query::<LoginForm>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_else(|error| {
            debug!("Ignoring login query: {error}");
            LoginForm::default()
        });

    let form = LoginForm::merged(body, query);
    gate.login(
        form.name.as_deref().unwrap_or_default(),
        form.password.as_deref().unwrap_or_default(),
    )
}

pub async fn logout(gate: web::Data<AuthGate>) -> Redirect {
    gate.logout()
}

// Neither stream checks the session cookie. Whoever can reach the port can
// watch the host telemetry, as the panel has always behaved.

/// Memory usage once per second as `[sequence, used_percent, total_mb, free_mb]`
pub async fn memory_stream(req: HttpRequest, body: web::Payload) -> Result<HttpResponse> {
    info!("Request for memory stream received");
    let (response, session, messages) =
        actix_ws::handle(&req, body).map_err(|error| Error::BadRequest(format!("{error}")))?;

    rt::spawn(stream::serve(
        session,
        messages,
        MemoryProducer::new(ProcMeminfo::default()),
    ));

    Ok(response)
}

/// CPU usage twice per second as `[sequence, used_percent]`
pub async fn cpu_stream(req: HttpRequest, body: web::Payload) -> Result<HttpResponse> {
    info!("Request for cpu stream received");
    let (response, session, messages) =
        actix_ws::handle(&req, body).map_err(|error| Error::BadRequest(format!("{error}")))?;

    rt::spawn(stream::serve(
        session,
        messages,
        CpuProducer::new(SysinfoCpu::new()),
    ));

    Ok(response)
}
