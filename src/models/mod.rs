use serde::{Deserialize, Deserializer};

pub mod berita;
pub mod contact_info;
pub mod dokumen;
pub mod galeri;
pub mod image_web;
pub mod informasi_desa;
pub mod kelembagaan;
pub mod layanan;
pub mod site_setting;
pub mod user;

/// Treats SQL NULL like a missing value so listings render blanks instead of
/// failing on half-filled rows.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
