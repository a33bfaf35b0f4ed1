use actix_web::{Error, HttpResponse, get, web};
use serde::Deserialize;

use super::AppState;
use crate::models::berita::NewsItem;
use crate::models::contact_info::ContactInfo;
use crate::models::dokumen::DocumentItem;
use crate::models::galeri::GalleryItem;
use crate::models::image_web::ImageWeb;
use crate::models::informasi_desa::InformasiDesa;
use crate::models::kelembagaan::KelembagaanDesa;
use crate::models::layanan::ServiceItem;
use crate::panel::SettingsPanel;
use crate::section::{Category, DisplaySection, Section};

#[derive(Debug, Default, Deserialize)]
pub struct SectionParams {
    kategori: Option<String>,
    index: Option<usize>,
}

async fn section_view<T: Section>(
    state: &AppState,
    params: &SectionParams,
) -> Result<HttpResponse, Error> {
    let store = state.store()?;
    let mut section = DisplaySection::<T>::mount(store.as_ref()).await;
    section.select_category(Category::parse(params.kategori.as_deref()));
    if let Some(index) = params.index {
        section.open(index);
    }
    Ok(HttpResponse::Ok().json(section.view()))
}

async fn first_row<T: Section>(state: &AppState) -> Result<HttpResponse, Error> {
    let store = state.store()?;
    let section = DisplaySection::<T>::mount(store.as_ref()).await;
    Ok(HttpResponse::Ok().json(section.first()))
}

//galeri
#[get("/api/galeri")]
pub async fn get_galeri(
    state: web::Data<AppState>,
    query: web::Query<SectionParams>,
) -> Result<HttpResponse, Error> {
    section_view::<GalleryItem>(&state, &query).await
}

//berita
#[get("/api/berita")]
pub async fn get_berita(
    state: web::Data<AppState>,
    query: web::Query<SectionParams>,
) -> Result<HttpResponse, Error> {
    section_view::<NewsItem>(&state, &query).await
}

#[get("/api/layanan")]
pub async fn get_layanan(
    state: web::Data<AppState>,
    query: web::Query<SectionParams>,
) -> Result<HttpResponse, Error> {
    section_view::<ServiceItem>(&state, &query).await
}

#[get("/api/dokumen")]
pub async fn get_dokumen(
    state: web::Data<AppState>,
    query: web::Query<SectionParams>,
) -> Result<HttpResponse, Error> {
    section_view::<DocumentItem>(&state, &query).await
}

#[get("/api/gambar")]
pub async fn get_gambar(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    section_view::<ImageWeb>(&state, &SectionParams::default()).await
}

#[get("/api/kelembagaan")]
pub async fn get_kelembagaan_publik(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    section_view::<KelembagaanDesa>(&state, &SectionParams::default()).await
}

// satu baris saja yang dipakai halaman kontak
#[get("/api/informasi-desa")]
pub async fn get_informasi_desa(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    first_row::<InformasiDesa>(&state).await
}

#[get("/api/kontak")]
pub async fn get_kontak(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    first_row::<ContactInfo>(&state).await
}

#[get("/api/pengaturan")]
pub async fn get_pengaturan(state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let store = state.store()?;
    let panel = SettingsPanel::mount(store).await;
    Ok(HttpResponse::Ok().json(panel.values()))
}
