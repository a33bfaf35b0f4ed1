use actix_web::{Error, HttpRequest, HttpResponse, get, put, web};

use super::{AppState, load_failed, panel_error, require_admin, saved_response};
use crate::models::contact_info::{ContactForm, ContactInfo};
use crate::panel::{AdminPanel, PanelState};

#[get("/api/adminpanel/kontak")]
pub async fn get_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    require_admin(&req, &state).await?;

    let panel = AdminPanel::<ContactInfo>::mount(state.store()?).await;
    Ok(HttpResponse::Ok().json(panel.snapshot()))
}

/// Overwrites the contact row; the first save on an empty table creates it.
#[put("/api/adminpanel/kontak")]
pub async fn update_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ContactForm>,
) -> Result<HttpResponse, Error> {
    let claims = require_admin(&req, &state).await?;

    let mut panel = AdminPanel::<ContactInfo>::mount(state.store()?).await;
    // an unread table must not turn the single contact row into two
    if !panel.is_loaded() {
        return Ok(load_failed(panel.snapshot()));
    }
    let opened = match panel.items().first().map(|c| c.id) {
        Some(id) => panel.begin_edit(id),
        None => panel.begin_create(),
    };
    opened.map_err(panel_error)?;
    panel.set_form(payload.into_inner()).map_err(panel_error)?;
    let saved = panel.submit().await.map_err(panel_error)?;
    if saved {
        log::info!("{} memperbarui informasi kontak", claims.sub);
    }

    let form_open = matches!(panel.state(), PanelState::Creating | PanelState::Editing(_));
    Ok(saved_response(saved, form_open, panel.snapshot()))
}
