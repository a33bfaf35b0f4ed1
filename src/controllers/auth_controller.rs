use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header;
use actix_web::{Error, HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, MSG_NOT_CONFIGURED};
use crate::auth::{self, COOKIE_NAME, MSG_LOGIN_FAILED};

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[post("/api/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, Error> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "status": "error", "message": "Username atau password kosong"
        })));
    }

    if !state.authenticator.login(username, &payload.password) {
        log::warn!("Login gagal untuk {}", username);
        return Ok(HttpResponse::Unauthorized().json(json!({
            "status": "error", "message": MSG_LOGIN_FAILED
        })));
    }

    let store = state.store()?;
    let profile =
        auth::ensure_profile(store.as_ref(), username, username, &state.config.default_role)
            .await
            .map_err(|e| {
                log::error!("Gagal menyiapkan profil {}: {}", username, e);
                actix_web::error::ErrorInternalServerError("Gagal menyiapkan profil pengguna")
            })?;

    let token = auth::generate_jwt(&profile, &state.config.jwt_secret).map_err(|e| {
        log::error!("Gagal menghasilkan JWT: {:?}", e);
        actix_web::error::ErrorInternalServerError("Gagal menghasilkan token")
    })?;

    let access_cookie = Cookie::build(COOKIE_NAME, token)
        .path("/")
        .http_only(true)
        .secure(false) // false untuk development (HTTP)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(2))
        .finish();

    Ok(HttpResponse::Ok().cookie(access_cookie).json(json!({
        "message": "Berhasil login",
        "role": profile.role,
    })))
}

#[post("/api/logout")]
pub async fn logout() -> HttpResponse {
    let expired = Cookie::build(COOKIE_NAME, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish();

    HttpResponse::Ok()
        .cookie(expired)
        .json(json!({ "message": "Berhasil logout" }))
}

/// Entry gate of the admin dashboard.
#[get("/api/adminpanel/session")]
pub async fn session(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let Some(store) = state.store.clone() else {
        return Ok(HttpResponse::ServiceUnavailable().json(json!({
            "configured": false,
            "message": MSG_NOT_CONFIGURED,
        })));
    };

    let Some(claims) = auth::current_user(&req, &state.config.jwt_secret) else {
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, state.config.public_site_url.as_str()))
            .finish());
    };

    let profile = auth::ensure_profile(
        store.as_ref(),
        &claims.user_id,
        &claims.sub,
        &state.config.default_role,
    )
    .await
    .map_err(|e| {
        log::error!("Gagal menyiapkan profil {}: {}", claims.sub, e);
        actix_web::error::ErrorInternalServerError("Gagal menyiapkan profil pengguna")
    })?;

    if !state.config.is_admin_role(&profile.role) {
        return Err(actix_web::error::ErrorForbidden(
            "Hanya admin yang dapat mengakses",
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "configured": true,
        "user": profile,
    })))
}
