//! Admin management panels: list + create + edit + delete over one table.
//!
//! A panel is a small state machine
//! `Loading -> Idle -> {Creating | Editing(id)} -> Saving -> Idle`
//! with a banner message that survives until the next save or delete.
//! Writes are never merged into local state; every write is followed by a
//! full reload from the store.
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::store::{ContentStore, Filter, Order, Query, StoreError, Table, from_rows, to_row};

pub mod settings;

pub use settings::SettingsPanel;

pub const MSG_LOAD_FAILED: &str = "Gagal memuat data. Silakan muat ulang halaman.";
pub const MSG_CREATED: &str = "Data berhasil ditambahkan";
pub const MSG_UPDATED: &str = "Data berhasil diperbarui";
pub const MSG_SAVE_FAILED: &str = "Gagal menyimpan data. Silakan coba lagi.";
pub const MSG_DELETED: &str = "Data berhasil dihapus";
pub const MSG_DELETE_FAILED: &str = "Gagal menghapus data. Silakan coba lagi.";

/// A record an admin panel can list and edit.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    const TABLE: Table;
    /// Editable fields, without the id. Sent as-is to insert/update.
    type Draft: Serialize + DeserializeOwned + Default + Clone + Send + Sync;

    fn id(&self) -> i64;

    fn draft(&self) -> Self::Draft;

    fn order() -> Option<Order> {
        None
    }

    fn validate(_draft: &Self::Draft) -> Result<(), &'static str> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Loading,
    Idle,
    Creating,
    Editing(i64),
    Saving,
}

impl Serialize for PanelState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PanelState::Loading => serializer.serialize_str("loading"),
            PanelState::Idle => serializer.serialize_str("idle"),
            PanelState::Creating => serializer.serialize_str("creating"),
            PanelState::Editing(id) => serializer.serialize_str(&format!("editing:{}", id)),
            PanelState::Saving => serializer.serialize_str("saving"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("masih ada form yang terbuka")]
    FormOpen,
    #[error("tidak ada form yang terbuka")]
    NoOpenForm,
    #[error("panel sedang memuat atau menyimpan")]
    Busy,
    #[error("data dengan id {0} tidak ditemukan")]
    NotFound(i64),
    #[error("data belum berhasil dimuat, perubahan ditolak")]
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed,
}

#[derive(Serialize)]
#[serde(bound(serialize = "R: Resource"))]
pub struct PanelSnapshot<'a, R: Resource> {
    pub state: PanelState,
    pub items: &'a [R],
    pub form: Option<&'a R::Draft>,
    pub message: Option<&'a Message>,
}

pub struct AdminPanel<R: Resource> {
    store: Arc<dyn ContentStore>,
    state: PanelState,
    items: Vec<R>,
    // whether `items` reflects the last read; writes need it
    loaded: bool,
    form: Option<R::Draft>,
    message: Option<Message>,
}

impl<R: Resource> AdminPanel<R> {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            state: PanelState::Loading,
            items: Vec::new(),
            loaded: false,
            form: None,
            message: None,
        }
    }

    /// Creates the panel and performs the initial load.
    pub async fn mount(store: Arc<dyn ContentStore>) -> Self {
        let mut panel = Self::new(store);
        panel.load().await;
        panel
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// `false` when the last read from the store failed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn form(&self) -> Option<&R::Draft> {
        self.form.as_ref()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn snapshot(&self) -> PanelSnapshot<'_, R> {
        PanelSnapshot {
            state: self.state,
            items: &self.items,
            form: self.form.as_ref(),
            message: self.message.as_ref(),
        }
    }

    pub async fn load(&mut self) {
        self.state = PanelState::Loading;
        if let Err(e) = self.reload().await {
            log::error!("Gagal memuat {}: {}", R::TABLE, e);
            self.message = Some(Message::error(MSG_LOAD_FAILED));
        }
        self.state = PanelState::Idle;
    }

    async fn reload(&mut self) -> Result<(), StoreError> {
        self.loaded = false;
        let query = Query::all().order(R::order());
        let rows = self.store.select(R::TABLE, &query).await?;
        self.items = from_rows(rows)?;
        self.loaded = true;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), PanelError> {
        match self.state {
            PanelState::Idle if !self.loaded => Err(PanelError::NotLoaded),
            PanelState::Idle => Ok(()),
            PanelState::Creating | PanelState::Editing(_) => Err(PanelError::FormOpen),
            PanelState::Loading | PanelState::Saving => Err(PanelError::Busy),
        }
    }

    pub fn begin_create(&mut self) -> Result<(), PanelError> {
        self.ensure_idle()?;
        self.form = Some(R::Draft::default());
        self.state = PanelState::Creating;
        Ok(())
    }

    pub fn begin_edit(&mut self, id: i64) -> Result<(), PanelError> {
        self.ensure_idle()?;
        let item = self
            .items
            .iter()
            .find(|item| item.id() == id)
            .ok_or(PanelError::NotFound(id))?;
        self.form = Some(item.draft());
        self.state = PanelState::Editing(id);
        Ok(())
    }

    pub fn form_mut(&mut self) -> Option<&mut R::Draft> {
        self.form.as_mut()
    }

    pub fn set_form(&mut self, draft: R::Draft) -> Result<(), PanelError> {
        match self.form.as_mut() {
            Some(form) => {
                *form = draft;
                Ok(())
            }
            None => Err(PanelError::NoOpenForm),
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, PanelState::Creating | PanelState::Editing(_)) {
            self.form = None;
            self.state = PanelState::Idle;
        }
    }

    /// Writes the open form, reloads, closes the form and posts a banner.
    /// Returns whether the write succeeded. A draft that fails validation
    /// is reported on the banner and the form stays open.
    pub async fn submit(&mut self) -> Result<bool, PanelError> {
        let target = self.state;
        let draft = match (target, self.form.clone()) {
            (PanelState::Creating | PanelState::Editing(_), Some(draft)) => draft,
            _ => return Err(PanelError::NoOpenForm),
        };
        if !self.loaded {
            return Err(PanelError::NotLoaded);
        }
        if let Err(reason) = R::validate(&draft) {
            self.message = Some(Message::error(reason));
            return Ok(false);
        }

        self.state = PanelState::Saving;
        let written = self.write(target, &draft).await;
        if let Err(e) = self.reload().await {
            log::error!("Gagal memuat ulang {} setelah simpan: {}", R::TABLE, e);
        }
        self.form = None;
        self.state = PanelState::Idle;

        self.message = Some(match &written {
            Ok(()) if target == PanelState::Creating => Message::success(MSG_CREATED),
            Ok(()) => Message::success(MSG_UPDATED),
            Err(e) => {
                log::error!("Gagal menyimpan ke {}: {}", R::TABLE, e);
                Message::error(MSG_SAVE_FAILED)
            }
        });
        Ok(written.is_ok())
    }

    async fn write(&self, target: PanelState, draft: &R::Draft) -> Result<(), StoreError> {
        let row = to_row(draft)?;
        match target {
            PanelState::Editing(id) => {
                self.store
                    .update(R::TABLE, row, &Filter::new("id", id))
                    .await
            }
            _ => self.store.insert(R::TABLE, row).await,
        }
    }

    /// Deletes a row once `confirm` agrees. Declining issues no store call.
    pub async fn delete<F>(&mut self, id: i64, confirm: F) -> Result<DeleteOutcome, PanelError>
    where
        F: FnOnce(&R) -> bool,
    {
        self.ensure_idle()?;
        let item = self
            .items
            .iter()
            .find(|item| item.id() == id)
            .ok_or(PanelError::NotFound(id))?;
        if !confirm(item) {
            return Ok(DeleteOutcome::Declined);
        }

        self.state = PanelState::Saving;
        let deleted = self
            .store
            .delete(R::TABLE, &Filter::new("id", id))
            .await;
        if let Err(e) = self.reload().await {
            log::error!("Gagal memuat ulang {} setelah hapus: {}", R::TABLE, e);
        }
        self.state = PanelState::Idle;

        Ok(match deleted {
            Ok(()) => {
                self.message = Some(Message::success(MSG_DELETED));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                log::error!("Gagal menghapus id {} dari {}: {}", id, R::TABLE, e);
                self.message = Some(Message::error(MSG_DELETE_FAILED));
                DeleteOutcome::Failed
            }
        })
    }
}
