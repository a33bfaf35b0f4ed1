use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod mysql;
pub mod rest;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use rest::RestStore;

/// One table row as the store hands it over: column name -> value.
pub type Row = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store belum dikonfigurasi")]
    NotConfigured,
    #[error("nama tabel/kolom tidak valid: {0}")]
    InvalidIdentifier(String),
    #[error("row harus berupa objek JSON")]
    NotAnObject,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend menolak permintaan ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("gagal decode row: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The tables this site reads and writes. Names are the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    SiteSettings,
    ContactInfo,
    InformasiDesa,
    KelembagaanDesa,
    GaleriDesa,
    BeritaDesa,
    DokumenDesa,
    LayananDesa,
    ImageWeb,
    Users,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::SiteSettings => "site_settings",
            Table::ContactInfo => "contact_info",
            Table::InformasiDesa => "web_content_informasi_desa",
            Table::KelembagaanDesa => "web_content_kelembagaan_desa",
            Table::GaleriDesa => "web_content_galeri_desa",
            Table::BeritaDesa => "web_content_berita_desa",
            Table::DokumenDesa => "web_content_dokumen_desa",
            Table::LayananDesa => "web_content_layanan_desa",
            Table::ImageWeb => "web_content_image_web",
            Table::Users => "users",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Equality match on a single column, used by select, update and delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.column).is_some_and(|v| loosely_equal(v, &self.value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(column, value));
        self
    }

    pub fn order(mut self, order: Option<Order>) -> Self {
        self.order = order;
        self
    }
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> StoreResult<Vec<Row>>;

    async fn insert(&self, table: Table, row: Row) -> StoreResult<()>;

    async fn update(&self, table: Table, row: Row, matching: &Filter) -> StoreResult<()>;

    async fn upsert(&self, table: Table, row: Row, conflict_key: &str) -> StoreResult<()>;

    async fn delete(&self, table: Table, matching: &Filter) -> StoreResult<()>;
}

/// Serializes a record into a store row.
pub fn to_row<T: Serialize>(value: &T) -> StoreResult<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(StoreError::from))
        .collect()
}

/// Table and column names are spliced into statements and URLs, so only
/// plain identifiers pass.
pub fn identifier(name: &str) -> StoreResult<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

// ids arrive as path segments (strings) while rows carry numbers
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::String(s)) | (Value::String(s), Value::Number(_)) => {
            let n = if a.is_number() { a } else { b };
            n.to_string() == *s
        }
        _ => a == b,
    }
}
