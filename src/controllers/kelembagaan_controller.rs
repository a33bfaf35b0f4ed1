use actix_web::{Error, HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, load_failed, panel_error, require_admin, saved_response};
use crate::models::kelembagaan::{KelembagaanDesa, KelembagaanForm};
use crate::panel::{AdminPanel, DeleteOutcome, PanelState};

#[get("/api/adminpanel/kelembagaan")]
pub async fn get_kelembagaan(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&req, &state).await?;

    let panel = AdminPanel::<KelembagaanDesa>::mount(state.store()?).await;
    Ok(HttpResponse::Ok().json(panel.snapshot()))
}

#[post("/api/adminpanel/kelembagaan")]
pub async fn create_kelembagaan(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<KelembagaanForm>,
) -> Result<HttpResponse, Error> {
    let claims = require_admin(&req, &state).await?;

    let mut panel = AdminPanel::<KelembagaanDesa>::mount(state.store()?).await;
    if !panel.is_loaded() {
        return Ok(load_failed(panel.snapshot()));
    }
    panel.begin_create().map_err(panel_error)?;
    panel.set_form(payload.into_inner()).map_err(panel_error)?;
    let saved = panel.submit().await.map_err(panel_error)?;
    if saved {
        log::info!("{} menambahkan data kelembagaan", claims.sub);
    }

    let form_open = panel.state() == PanelState::Creating;
    Ok(saved_response(saved, form_open, panel.snapshot()))
}

#[put("/api/adminpanel/kelembagaan/{id}")]
pub async fn update_kelembagaan(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<KelembagaanForm>,
) -> Result<HttpResponse, Error> {
    let claims = require_admin(&req, &state).await?;
    let id = path.into_inner();

    let mut panel = AdminPanel::<KelembagaanDesa>::mount(state.store()?).await;
    if !panel.is_loaded() {
        return Ok(load_failed(panel.snapshot()));
    }
    panel.begin_edit(id).map_err(panel_error)?;
    panel.set_form(payload.into_inner()).map_err(panel_error)?;
    let saved = panel.submit().await.map_err(panel_error)?;
    if saved {
        log::info!("{} memperbarui kelembagaan id {}", claims.sub, id);
    }

    let form_open = panel.state() == PanelState::Editing(id);
    Ok(saved_response(saved, form_open, panel.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

#[delete("/api/adminpanel/kelembagaan/{id}")]
pub async fn delete_kelembagaan(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<DeleteParams>,
) -> Result<HttpResponse, Error> {
    let claims = require_admin(&req, &state).await?;
    let id = path.into_inner();
    let confirmed = query.confirm;

    let mut panel = AdminPanel::<KelembagaanDesa>::mount(state.store()?).await;
    if !panel.is_loaded() {
        return Ok(load_failed(panel.snapshot()));
    }
    let outcome = panel
        .delete(id, |_| confirmed)
        .await
        .map_err(panel_error)?;

    match outcome {
        DeleteOutcome::Declined => Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Penghapusan harus dikonfirmasi dengan confirm=true"
        }))),
        DeleteOutcome::Deleted => {
            log::info!("{} menghapus kelembagaan id {}", claims.sub, id);
            Ok(HttpResponse::Ok().json(panel.snapshot()))
        }
        DeleteOutcome::Failed => Ok(HttpResponse::InternalServerError().json(panel.snapshot())),
    }
}
