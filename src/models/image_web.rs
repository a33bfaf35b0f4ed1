use serde::{Deserialize, Serialize};

use super::nullable;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageWeb {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub nama: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link_foto: String,
}

impl Section for ImageWeb {
    const TABLE: Table = Table::ImageWeb;

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }
}
