use std::collections::BTreeMap;

use actix_web::{Error, HttpRequest, HttpResponse, get, put, web};

use super::{AppState, load_failed, panel_error, require_admin, saved_response};
use crate::panel::SettingsPanel;

#[get("/api/adminpanel/pengaturan")]
pub async fn get_settings(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&req, &state).await?;

    let panel = SettingsPanel::mount(state.store()?).await;
    Ok(HttpResponse::Ok().json(panel.snapshot()))
}

/// Body is `{setting_key: setting_value}` for the keys that changed.
#[put("/api/adminpanel/pengaturan")]
pub async fn update_settings(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<BTreeMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let claims = require_admin(&req, &state).await?;

    let mut panel = SettingsPanel::mount(state.store()?).await;
    if !panel.is_loaded() {
        return Ok(load_failed(panel.snapshot()));
    }
    for (key, value) in payload.iter() {
        if key.trim().is_empty() {
            return Err(actix_web::error::ErrorBadRequest("setting_key tidak boleh kosong"));
        }
        panel.set(key, value).map_err(panel_error)?;
    }
    let saved = panel.save(&claims.sub).await.map_err(panel_error)?;

    Ok(saved_response(saved, false, panel.snapshot()))
}
