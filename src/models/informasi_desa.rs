use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformasiDesa {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub kecamatan: String,
    #[serde(default, deserialize_with = "nullable")]
    pub kabupaten: String,
    #[serde(default, deserialize_with = "nullable")]
    pub provinsi: String,
    #[serde(default, deserialize_with = "nullable")]
    pub nomor_pos: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub facebook: String,
    #[serde(default, deserialize_with = "nullable")]
    pub instagram: String,
    #[serde(default, deserialize_with = "nullable")]
    pub youtube: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tiktok: String,
}

impl Section for InformasiDesa {
    const TABLE: Table = Table::InformasiDesa;

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }
}
