use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::{MSG_LOAD_FAILED, MSG_SAVE_FAILED, Message, PanelError, PanelState};
use crate::models::site_setting::SiteSetting;
use crate::store::{ContentStore, Order, Query, StoreError, Table, from_rows, to_row};

pub const MSG_SETTINGS_SAVED: &str = "Pengaturan berhasil disimpan";
pub const MSG_NO_CHANGES: &str = "Tidak ada perubahan untuk disimpan";

const CONFLICT_KEY: &str = "setting_key";

#[derive(Serialize)]
pub struct SettingsSnapshot<'a> {
    pub state: PanelState,
    pub settings: Vec<&'a SiteSetting>,
    pub dirty: Vec<&'a str>,
    pub message: Option<&'a Message>,
}

/// Key-value panel over `site_settings`. Edits stay local until `save`,
/// which upserts each changed key on its own.
pub struct SettingsPanel {
    store: Arc<dyn ContentStore>,
    state: PanelState,
    settings: BTreeMap<String, SiteSetting>,
    loaded: bool,
    dirty: BTreeSet<String>,
    // keys not yet in the table; their type and description stay with the store
    fresh: BTreeSet<String>,
    message: Option<Message>,
}

impl SettingsPanel {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            state: PanelState::Loading,
            settings: BTreeMap::new(),
            loaded: false,
            dirty: BTreeSet::new(),
            fresh: BTreeSet::new(),
            message: None,
        }
    }

    pub async fn mount(store: Arc<dyn ContentStore>) -> Self {
        let mut panel = Self::new(store);
        panel.load().await;
        panel
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|s| s.setting_value.as_str())
    }

    pub fn values(&self) -> BTreeMap<&str, &str> {
        self.settings
            .iter()
            .map(|(k, s)| (k.as_str(), s.setting_value.as_str()))
            .collect()
    }

    pub fn snapshot(&self) -> SettingsSnapshot<'_> {
        SettingsSnapshot {
            state: self.state,
            settings: self.settings.values().collect(),
            dirty: self.dirty.iter().map(String::as_str).collect(),
            message: self.message.as_ref(),
        }
    }

    pub async fn load(&mut self) {
        self.state = PanelState::Loading;
        if let Err(e) = self.reload().await {
            log::error!("Gagal memuat {}: {}", Table::SiteSettings, e);
            self.message = Some(Message::error(MSG_LOAD_FAILED));
        }
        self.state = PanelState::Idle;
    }

    async fn reload(&mut self) -> Result<(), StoreError> {
        self.loaded = false;
        let query = Query::all().order(Some(Order::asc(CONFLICT_KEY)));
        let rows = self.store.select(Table::SiteSettings, &query).await?;
        let settings: Vec<SiteSetting> = from_rows(rows)?;
        self.settings = settings
            .into_iter()
            .map(|s| (s.setting_key.clone(), s))
            .collect();
        self.dirty.clear();
        self.fresh.clear();
        self.loaded = true;
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), PanelError> {
        if self.state != PanelState::Idle {
            return Err(PanelError::Busy);
        }
        if !self.loaded {
            return Err(PanelError::NotLoaded);
        }
        Ok(())
    }

    /// Edits a value locally. Unknown keys become new `text` settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PanelError> {
        self.ensure_writable()?;
        let key = key.trim();
        match self.settings.get_mut(key) {
            Some(setting) if setting.setting_value == value => return Ok(()),
            Some(setting) => setting.setting_value = value.to_string(),
            None => {
                self.settings
                    .insert(key.to_string(), SiteSetting::new(key, value));
                self.fresh.insert(key.to_string());
            }
        }
        self.dirty.insert(key.to_string());
        Ok(())
    }

    /// Upserts every changed key in key order, stopping at the first
    /// failure. Keys written before the failure stay written.
    pub async fn save(&mut self, updated_by: &str) -> Result<bool, PanelError> {
        self.ensure_writable()?;
        if self.dirty.is_empty() {
            self.message = Some(Message::success(MSG_NO_CHANGES));
            return Ok(true);
        }

        self.state = PanelState::Saving;
        let updated_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut outcome = Ok(());
        for key in &self.dirty {
            let Some(setting) = self.settings.get(key) else {
                continue;
            };
            let row = if self.fresh.contains(key) {
                to_row(&json!({
                    "setting_key": setting.setting_key,
                    "setting_value": setting.setting_value,
                    "updated_by": updated_by,
                    "updated_at": updated_at,
                }))
            } else {
                to_row(&SiteSetting {
                    updated_by: Some(updated_by.to_string()),
                    updated_at: Some(updated_at.clone()),
                    ..setting.clone()
                })
            };
            let written = match row {
                Ok(row) => self.store.upsert(Table::SiteSettings, row, CONFLICT_KEY).await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                log::error!("Gagal menyimpan pengaturan {}: {}", key, e);
                outcome = Err(e);
                break;
            }
        }

        if let Err(e) = self.reload().await {
            log::error!("Gagal memuat ulang {} setelah simpan: {}", Table::SiteSettings, e);
        }
        self.state = PanelState::Idle;
        let saved = outcome.is_ok();
        self.message = Some(if saved {
            Message::success(MSG_SETTINGS_SAVED)
        } else {
            Message::error(MSG_SAVE_FAILED)
        });
        Ok(saved)
    }
}
