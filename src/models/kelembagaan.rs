use serde::{Deserialize, Serialize};

use super::nullable;
use crate::panel::Resource;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KelembagaanDesa {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub jabatan: String,
    #[serde(default, deserialize_with = "nullable")]
    pub jumlah_menjabat: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KelembagaanForm {
    pub jabatan: String,
    pub jumlah_menjabat: i64,
}

impl Resource for KelembagaanDesa {
    const TABLE: Table = Table::KelembagaanDesa;
    type Draft = KelembagaanForm;

    fn id(&self) -> i64 {
        self.id
    }

    fn draft(&self) -> KelembagaanForm {
        KelembagaanForm {
            jabatan: self.jabatan.clone(),
            jumlah_menjabat: self.jumlah_menjabat,
        }
    }

    fn order() -> Option<Order> {
        Some(Order::asc("jabatan"))
    }

    fn validate(draft: &KelembagaanForm) -> Result<(), &'static str> {
        if draft.jabatan.trim().is_empty() {
            return Err("Jabatan wajib diisi");
        }
        if draft.jumlah_menjabat < 0 {
            return Err("Jumlah menjabat tidak boleh negatif");
        }
        Ok(())
    }
}

impl Section for KelembagaanDesa {
    const TABLE: Table = Table::KelembagaanDesa;

    fn order() -> Option<Order> {
        Some(Order::asc("jabatan"))
    }
}
