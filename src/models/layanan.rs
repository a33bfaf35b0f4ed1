use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub nama: String,
    #[serde(default, deserialize_with = "nullable")]
    pub deskripsi: String,
    /// External form where residents submit the service request.
    #[serde(default)]
    pub link_submit: Option<String>,
}

impl Section for ServiceItem {
    const TABLE: Table = Table::LayananDesa;

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }
}
