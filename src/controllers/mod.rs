use std::sync::Arc;

use actix_web::error::{
    ErrorConflict, ErrorForbidden, ErrorInternalServerError, ErrorNotFound,
    ErrorServiceUnavailable, ErrorUnauthorized,
};
use actix_web::{Error, HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::auth::{self, Authenticator, Claims};
use crate::config::Config;
use crate::panel::PanelError;
use crate::store::ContentStore;

pub mod auth_controller;
pub mod contact_controller;
pub mod home_controller;
pub mod kelembagaan_controller;
pub mod settings_controller;

pub const MSG_NOT_CONFIGURED: &str = "Content store belum dikonfigurasi. Isi DATABASE_URL, atau CONTENT_STORE_URL dan CONTENT_STORE_KEY, di file .env lalu jalankan ulang server.";

pub struct AppState {
    pub config: Config,
    pub store: Option<Arc<dyn ContentStore>>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn store(&self) -> Result<Arc<dyn ContentStore>, Error> {
        self.store
            .clone()
            .ok_or_else(|| ErrorServiceUnavailable(MSG_NOT_CONFIGURED))
    }
}

/// Session check shared by every admin endpoint. The role comes from the
/// stored profile, not the token, so a demoted user loses access at once.
pub async fn require_admin(req: &HttpRequest, state: &AppState) -> Result<Claims, Error> {
    let mut claims = auth::verify_jwt(req, &state.config.jwt_secret)
        .map_err(|_| ErrorUnauthorized("Sesi tidak valid, silakan login kembali"))?;

    let store = state.store()?;
    let profile = auth::find_profile(store.as_ref(), &claims.user_id)
        .await
        .map_err(|e| {
            log::error!("Gagal membaca profil {}: {}", claims.sub, e);
            ErrorInternalServerError("Gagal memeriksa profil pengguna")
        })?
        .ok_or_else(|| ErrorUnauthorized("Sesi tidak valid, silakan login kembali"))?;

    if !state.config.is_admin_role(&profile.role) {
        return Err(ErrorForbidden("Hanya admin yang dapat mengakses"));
    }
    claims.role = profile.role;
    Ok(claims)
}

pub fn panel_error(e: PanelError) -> Error {
    match e {
        PanelError::NotFound(_) => ErrorNotFound(e.to_string()),
        PanelError::FormOpen | PanelError::NoOpenForm => ErrorConflict(e.to_string()),
        PanelError::Busy => ErrorServiceUnavailable(e.to_string()),
        PanelError::NotLoaded => ErrorInternalServerError(e.to_string()),
    }
}

/// Answer for a write whose panel could not read the table first.
pub fn load_failed<T: Serialize>(snapshot: T) -> HttpResponse {
    HttpResponse::InternalServerError().json(snapshot)
}

/// Status for a panel response after a save: the snapshot always goes back,
/// the status tells whether the write landed.
pub fn saved_response<T: Serialize>(saved: bool, form_still_open: bool, snapshot: T) -> HttpResponse {
    if saved {
        HttpResponse::Ok().json(snapshot)
    } else if form_still_open {
        HttpResponse::BadRequest().json(snapshot)
    } else {
        HttpResponse::InternalServerError().json(snapshot)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        //home_controller
        .service(home_controller::get_galeri)
        .service(home_controller::get_berita)
        .service(home_controller::get_layanan)
        .service(home_controller::get_dokumen)
        .service(home_controller::get_gambar)
        .service(home_controller::get_informasi_desa)
        .service(home_controller::get_kelembagaan_publik)
        .service(home_controller::get_kontak)
        .service(home_controller::get_pengaturan)
        //auth_controller
        .service(auth_controller::login)
        .service(auth_controller::logout)
        .service(auth_controller::session)
        //kelembagaan_controller
        .service(kelembagaan_controller::get_kelembagaan)
        .service(kelembagaan_controller::create_kelembagaan)
        .service(kelembagaan_controller::update_kelembagaan)
        .service(kelembagaan_controller::delete_kelembagaan)
        //contact_controller
        .service(contact_controller::get_contact)
        .service(contact_controller::update_contact)
        //settings_controller
        .service(settings_controller::get_settings)
        .service(settings_controller::update_settings);
}
