use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub judul: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link_foto: String,
    #[serde(default)]
    pub tanggal: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub kategori: String,
    #[serde(default, deserialize_with = "nullable")]
    pub deskripsi_singkat: String,
    #[serde(default, deserialize_with = "nullable")]
    pub isi: String,
}

impl Section for NewsItem {
    const TABLE: Table = Table::BeritaDesa;

    fn order() -> Option<Order> {
        Some(Order::desc("tanggal"))
    }

    fn category(&self) -> Option<&str> {
        Some(&self.kategori)
    }
}
