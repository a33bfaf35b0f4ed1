use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use desa_suntenjaya_backend::auth::{self, ConfigAuthenticator, MSG_LOGIN_FAILED};
use desa_suntenjaya_backend::config::Config;
use desa_suntenjaya_backend::controllers::{self, AppState};
use desa_suntenjaya_backend::models::user::UserProfile;
use desa_suntenjaya_backend::panel::{MSG_CREATED, MSG_LOAD_FAILED};
use desa_suntenjaya_backend::store::memory::Operation;
use desa_suntenjaya_backend::store::{ContentStore, MemoryStore, Table, to_row};

fn state_with(store: Option<MemoryStore>) -> web::Data<AppState> {
    let config = Config::default();
    let hash = bcrypt::hash("desa123", 4).unwrap();
    web::Data::new(AppState {
        authenticator: Arc::new(ConfigAuthenticator::new("admin", Some(&hash))),
        store: store.map(|s| Arc::new(s) as Arc<dyn ContentStore>),
        config,
    })
}

fn session_cookie(role: &str) -> Cookie<'static> {
    let profile = UserProfile {
        id: "admin".into(),
        username: "admin".into(),
        role: role.into(),
        created_at: None,
    };
    let token = auth::generate_jwt(&profile, &Config::default().jwt_secret).unwrap();
    Cookie::new(auth::COOKIE_NAME, token)
}

/// Stored profile behind [`session_cookie`]; admin checks read the role here.
fn with_profile(store: MemoryStore, role: &str) -> MemoryStore {
    store.with_rows(
        Table::Users,
        vec![to_row(&json!({"id": "admin", "username": "admin", "role": role})).unwrap()],
    )
}

fn gallery_store() -> MemoryStore {
    MemoryStore::new().with_rows(
        Table::GaleriDesa,
        vec![
            to_row(&json!({"id": 1, "judul": "A", "link_foto": "a.jpg", "tanggal": "2024-03-01", "kategori": "Kegiatan"})).unwrap(),
            to_row(&json!({"id": 2, "judul": "B", "link_foto": "b.jpg", "tanggal": "2024-02-01", "kategori": "Wisata"})).unwrap(),
            to_row(&json!({"id": 3, "judul": "C", "link_foto": "c.jpg", "tanggal": "2024-01-01", "kategori": "Kegiatan", "deskripsi": null})).unwrap(),
        ],
    )
}

#[actix_web::test]
async fn gallery_filters_and_selects_from_the_displayed_list() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(gallery_store())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/galeri?kategori=Kegiatan&index=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["loaded"], json!(true));
    assert_eq!(body["category"], json!("Kegiatan"));
    assert_eq!(body["categories"], json!(["Kegiatan", "Wisata"]));
    let judul: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["judul"].clone())
        .collect();
    assert_eq!(judul, vec![json!("A"), json!("C")]);
    assert_eq!(body["selected"]["judul"], json!("C"));
}

#[actix_web::test]
async fn gallery_all_sentinel_and_out_of_range_index() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(gallery_store())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/galeri?kategori=Semua&index=9")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["category"], Value::Null);
    assert_eq!(body["selected"], Value::Null);
}

#[actix_web::test]
async fn public_sections_render_empty_tables() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(MemoryStore::new())))
            .configure(controllers::configure),
    )
    .await;

    for uri in ["/api/berita", "/api/layanan", "/api/dokumen", "/api/gambar", "/api/kelembagaan"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["items"], json!([]), "{}", uri);
        assert_eq!(body["loaded"], json!(true), "{}", uri);
    }

    let req = test::TestRequest::get().uri("/api/informasi-desa").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn unconfigured_store_answers_with_configuration_message() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(None))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/berita").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let req = test::TestRequest::get()
        .uri("/api/adminpanel/session")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["configured"], json!(false));
}

#[actix_web::test]
async fn session_without_user_redirects_to_public_site() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(MemoryStore::new())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/adminpanel/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn session_provisions_profile_and_fails_closed() {
    let store = MemoryStore::new();
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/adminpanel/session")
        .cookie(session_cookie("admin"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["role"], json!("admin"));
    assert_eq!(store.rows(Table::Users).len(), 1);

    let failing = MemoryStore::new();
    failing.fail_on(Operation::Insert, Table::Users);
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(failing)))
            .configure(controllers::configure),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/api/adminpanel/session")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn login_maps_failure_to_fixed_message() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(MemoryStore::new())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"username": "admin", "password": "salah"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!(MSG_LOGIN_FAILED));

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({"username": "admin", "password": "desa123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.response()
            .cookies()
            .any(|c| c.name() == auth::COOKIE_NAME)
    );
}

#[actix_web::test]
async fn admin_endpoints_require_an_admin_session() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(with_profile(MemoryStore::new(), "warga"))))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/adminpanel/kelembagaan").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/adminpanel/kelembagaan")
        .cookie(session_cookie("warga"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn creating_a_role_inserts_once_and_shows_it_after_reload() {
    let store = with_profile(MemoryStore::new(), "admin");
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/adminpanel/kelembagaan")
        .cookie(session_cookie("admin"))
        .set_json(json!({"jabatan": "Ketua RT", "jumlah_menjabat": 5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(store.calls_of(Operation::Insert).len(), 1);
    assert_eq!(body["state"], json!("idle"));
    assert_eq!(body["form"], Value::Null);
    assert_eq!(body["message"]["text"], json!(MSG_CREATED));
    assert_eq!(body["items"][0]["jabatan"], json!("Ketua RT"));
    assert_eq!(body["items"][0]["jumlah_menjabat"], json!(5));
}

#[actix_web::test]
async fn delete_needs_confirmation() {
    let store = with_profile(MemoryStore::new(), "admin").with_rows(
        Table::KelembagaanDesa,
        vec![to_row(&json!({"id": 1, "jabatan": "Ketua RW", "jumlah_menjabat": 2})).unwrap()],
    );
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::delete()
        .uri("/api/adminpanel/kelembagaan/1")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.calls_of(Operation::Delete).is_empty());
    assert_eq!(store.rows(Table::KelembagaanDesa).len(), 1);

    let req = test::TestRequest::delete()
        .uri("/api/adminpanel/kelembagaan/1?confirm=true")
        .cookie(session_cookie("admin"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(store.calls_of(Operation::Delete).len(), 1);
    assert_eq!(body["items"], json!([]));

    let req = test::TestRequest::delete()
        .uri("/api/adminpanel/kelembagaan/1?confirm=true")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn settings_save_upserts_changed_key() {
    let store = with_profile(MemoryStore::new(), "admin").with_rows(
        Table::SiteSettings,
        vec![to_row(&json!({"setting_key": "site_name", "setting_value": "Desa Suntenjaya", "setting_type": "text"})).unwrap()],
    );
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/adminpanel/pengaturan")
        .cookie(session_cookie("admin"))
        .set_json(json!({"contact_email": "a@b.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"]["kind"], json!("success"));

    let upserts = store.calls_of(Operation::Upsert);
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].row.as_ref().unwrap()["setting_key"], json!("contact_email"));

    let req = test::TestRequest::get().uri("/api/pengaturan").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["contact_email"], json!("a@b.com"));
    assert_eq!(body["site_name"], json!("Desa Suntenjaya"));
}

#[actix_web::test]
async fn contact_save_creates_then_overwrites() {
    let store = with_profile(MemoryStore::new(), "admin");
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    for phone in ["022-1234", "022-5678"] {
        let req = test::TestRequest::put()
            .uri("/api/adminpanel/kontak")
            .cookie(session_cookie("admin"))
            .set_json(json!({"address": "Jl. Suntenjaya No. 1", "phone": phone, "email": "desa@suntenjaya.id"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(store.calls_of(Operation::Insert).len(), 1);
    assert_eq!(store.calls_of(Operation::Update).len(), 1);
    let req = test::TestRequest::get().uri("/api/kontak").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["phone"], json!("022-5678"));
    assert_eq!(body["service_hours"], json!(""));
}

#[actix_web::test]
async fn failed_write_returns_error_banner_and_unchanged_list() {
    let store = with_profile(MemoryStore::new(), "admin").with_rows(
        Table::KelembagaanDesa,
        vec![to_row(&json!({"id": 1, "jabatan": "Ketua RW", "jumlah_menjabat": 2})).unwrap()],
    );
    store.fail_on(Operation::Update, Table::KelembagaanDesa);
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/adminpanel/kelembagaan/1")
        .cookie(session_cookie("admin"))
        .set_json(json!({"jabatan": "Ketua RW 02", "jumlah_menjabat": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"]["kind"], json!("error"));
    assert_eq!(body["items"][0]["jabatan"], json!("Ketua RW"));
}

#[actix_web::test]
async fn demoted_user_loses_access_before_token_expiry() {
    let store = with_profile(MemoryStore::new(), "warga");
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/adminpanel/kelembagaan")
        .cookie(session_cookie("admin"))
        .set_json(json!({"jabatan": "Ketua RT", "jumlah_menjabat": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(store.calls_of(Operation::Insert).is_empty());

    let req = test::TestRequest::get()
        .uri("/api/adminpanel/kontak")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn token_without_stored_profile_is_unauthorized() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(MemoryStore::new())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/adminpanel/pengaturan")
        .cookie(session_cookie("admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn contact_is_not_duplicated_when_the_read_fails() {
    let store = with_profile(MemoryStore::new(), "admin").with_rows(
        Table::ContactInfo,
        vec![to_row(&json!({"id": 1, "address": "Jl. Suntenjaya No. 1", "phone": "022-1234", "email": "desa@suntenjaya.id"})).unwrap()],
    );
    store.fail_on(Operation::Select, Table::ContactInfo);
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/adminpanel/kontak")
        .cookie(session_cookie("admin"))
        .set_json(json!({"address": "Jl. Baru", "phone": "022-9999", "email": "desa@suntenjaya.id"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"]["text"], json!(MSG_LOAD_FAILED));

    assert!(store.calls_of(Operation::Insert).is_empty());
    assert!(store.calls_of(Operation::Update).is_empty());
    let rows = store.rows(Table::ContactInfo);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["phone"], json!("022-1234"));
}

#[actix_web::test]
async fn settings_metadata_survives_a_failed_read() {
    let store = with_profile(MemoryStore::new(), "admin").with_rows(
        Table::SiteSettings,
        vec![to_row(&json!({"setting_key": "site_name", "setting_value": "Desa Suntenjaya", "setting_type": "textarea", "description": "Nama situs"})).unwrap()],
    );
    store.fail_on(Operation::Select, Table::SiteSettings);
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/adminpanel/pengaturan")
        .cookie(session_cookie("admin"))
        .set_json(json!({"site_name": "Desa X"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert!(store.calls_of(Operation::Upsert).is_empty());
    let stored = &store.rows(Table::SiteSettings)[0];
    assert_eq!(stored["setting_value"], json!("Desa Suntenjaya"));
    assert_eq!(stored["setting_type"], json!("textarea"));
    assert_eq!(stored["description"], json!("Nama situs"));
}

#[actix_web::test]
async fn rejected_draft_keeps_the_form_open() {
    let store = with_profile(MemoryStore::new(), "admin");
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(store.clone())))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/adminpanel/kelembagaan")
        .cookie(session_cookie("admin"))
        .set_json(json!({"jabatan": "  ", "jumlah_menjabat": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], json!("creating"));
    assert_eq!(body["form"]["jumlah_menjabat"], json!(2));
    assert_eq!(body["message"]["text"], json!("Jabatan wajib diisi"));

    let req = test::TestRequest::put()
        .uri("/api/adminpanel/kontak")
        .cookie(session_cookie("admin"))
        .set_json(json!({"address": "Jl. Suntenjaya No. 1", "phone": "022-1234", "email": "bukan-email"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], json!("creating"));
    assert_eq!(body["form"]["email"], json!("bukan-email"));
    assert_eq!(body["message"]["text"], json!("Format email tidak valid"));

    assert!(store.calls_of(Operation::Insert).is_empty());
}
