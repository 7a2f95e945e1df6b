//! HTTP server that feeds the map front end.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router, Server,
};
use log::info;
use projector::{DisplayMode, DisplayPoint};
use serde_json::json;

use crate::{
    error::{Error, ErrorKind},
    render,
    session::Session,
};

mod dto;

pub use dto::*;

pub async fn run(addr: SocketAddr, session: Arc<Session>) {
    let router = new_router(session);

    info!("📣 HTTP server listening on {addr}");
    Server::bind(&addr)
        .serve(router.into_make_service())
        .await
        .expect("Failed to run http server");
}

pub fn new_router(session: Arc<Session>) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/stats", get(get_stats))
        .route("/modes", get(get_modes))
        .route("/mode", post(select_mode))
        .route("/points", get(get_points))
        .route("/points.geojson", get(get_geojson))
        .route("/render-error", post(report_render_error))
        .fallback(not_found)
        .layer(Extension(session))
}

async fn get_status(Extension(session): Extension<Arc<Session>>) -> impl IntoResponse {
    let status = session.status();
    info!("📣 << get_status response: {:?}", status);

    Json(status)
}

async fn get_stats(
    Extension(session): Extension<Arc<Session>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = session.summary()?;
    info!("📣 << get_stats response: {:?}", stats);

    Ok(Json(StatsResp::from(stats)))
}

async fn get_modes(Extension(session): Extension<Arc<Session>>) -> impl IntoResponse {
    let active = session.mode();
    let modes = render::mode_options(session.projector(), active);

    Json(ModesResp { active, modes })
}

async fn select_mode(
    Extension(session): Extension<Arc<Session>>,
    Json(req): Json<ModeReq>,
) -> Result<impl IntoResponse, HttpError> {
    info!("📣 >> select_mode: {:?}", req);
    let mode: DisplayMode = req.mode.parse().map_err(Error::from)?;
    let points = session.select_mode(mode)?.ok_or(Error::NotReady)?;
    info!("📣 << select_mode: {} points", points.len());

    Ok(Json(json!({ "mode": mode, "count": points.len() })))
}

async fn get_points(
    Extension(session): Extension<Arc<Session>>,
    Query(params): Query<PointsReq>,
) -> Result<impl IntoResponse, HttpError> {
    info!("📣 >> get_points by: {:?}", params);
    let (mode, points) = current_points(&session, params.mode.as_deref())?;
    info!("📣 << get_points response: {} points in mode {mode}", points.len());

    Ok(Json(json!(PointsResp::new(mode, &points))))
}

async fn get_geojson(
    Extension(session): Extension<Arc<Session>>,
    Query(params): Query<PointsReq>,
) -> Result<impl IntoResponse, HttpError> {
    info!("📣 >> get_geojson by: {:?}", params);
    let (mode, points) = current_points(&session, params.mode.as_deref())?;
    info!("📣 << get_geojson response: {} features in mode {mode}", points.len());

    Ok(Json(render::feature_collection(&points)))
}

async fn report_render_error(
    Extension(session): Extension<Arc<Session>>,
    Json(req): Json<RenderErrorReq>,
) -> impl IntoResponse {
    let err = session.report_render_error(&req.detail);

    (
        StatusCode::ACCEPTED,
        Json(json!({ "kind": err.kind(), "error": err.to_string() })),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

// Reads never switch the active mode, that only happens through `POST /mode`.
fn current_points(
    session: &Session,
    mode: Option<&str>,
) -> Result<(DisplayMode, Arc<Vec<DisplayPoint>>), Error> {
    match mode {
        Some(mode) => {
            let mode: DisplayMode = mode.parse()?;
            Ok((mode, session.preview(mode)?))
        }
        None => session.points(),
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
struct HttpError(Error);

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::InvalidMode => StatusCode::BAD_REQUEST,
            ErrorKind::NotReady => StatusCode::CONFLICT,
            ErrorKind::EmptyPool => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::DatasetFetch | ErrorKind::DatasetParse => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::RenderingInit | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "kind": kind, "error": self.to_string() }));

        (status, body).into_response()
    }
}
