use serde::{Deserialize, Serialize};

use super::nullable;
use crate::panel::Resource;
use crate::section::Section;
use crate::store::{Order, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub service_hours: String,
    #[serde(default, deserialize_with = "nullable")]
    pub facebook_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub instagram_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub youtube_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tiktok_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub service_hours: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub tiktok_url: String,
}

impl Resource for ContactInfo {
    const TABLE: Table = Table::ContactInfo;
    type Draft = ContactForm;

    fn id(&self) -> i64 {
        self.id
    }

    fn draft(&self) -> ContactForm {
        ContactForm {
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            service_hours: self.service_hours.clone(),
            facebook_url: self.facebook_url.clone(),
            instagram_url: self.instagram_url.clone(),
            youtube_url: self.youtube_url.clone(),
            tiktok_url: self.tiktok_url.clone(),
        }
    }

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }

    fn validate(draft: &ContactForm) -> Result<(), &'static str> {
        let email = draft.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err("Format email tidak valid");
        }
        Ok(())
    }
}

impl Section for ContactInfo {
    const TABLE: Table = Table::ContactInfo;

    fn order() -> Option<Order> {
        Some(Order::asc("id"))
    }
}
