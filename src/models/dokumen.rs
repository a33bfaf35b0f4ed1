use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub nama: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link: String,
}

impl Section for DocumentItem {
    const TABLE: Table = Table::DokumenDesa;

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }
}
