use serde::Deserialize;

use crate::projection::{nested, one_or_many};

/// Download location of an app version, as returned by `/fdfe/delivery`.
///
/// Every field is bound to its wire tag; absent tags leave the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Delivery {
    /// Application status; see [`check_status`](crate::check_status).
    #[serde(rename = "1")]
    pub status: i32,
    #[serde(rename = "2", deserialize_with = "nested")]
    pub app_delivery_data: AppDeliveryData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppDeliveryData {
    /// URL of the base APK.
    #[serde(rename = "3")]
    pub download_url: String,
    /// Split APKs in wire order. Empty when the app ships a single APK.
    #[serde(rename = "15", deserialize_with = "one_or_many")]
    pub splits: Vec<Split>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Split {
    #[serde(rename = "1")]
    pub id: String,
    #[serde(rename = "5")]
    pub download_url: String,
}

impl Delivery {
    pub fn download_url(&self) -> &str {
        &self.app_delivery_data.download_url
    }

    pub fn splits(&self) -> &[Split] {
        &self.app_delivery_data.splits
    }
}
