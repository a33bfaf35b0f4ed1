use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub judul: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link_foto: String,
    #[serde(default)]
    pub tanggal: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub kategori: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
}

impl Section for GalleryItem {
    const TABLE: Table = Table::GaleriDesa;

    fn order() -> Option<Order> {
        Some(Order::desc("tanggal"))
    }

    fn category(&self) -> Option<&str> {
        Some(&self.kategori)
    }
}
