use std::fmt;

use serde::Deserialize;

use crate::helpers::{format_amount, format_size};
use crate::projection::{float_bits, nested, one_or_many};

/// App metadata snapshot, as returned by `/fdfe/details`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Details {
    #[serde(rename = "4", deserialize_with = "nested")]
    pub doc: Document,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(rename = "5")]
    pub title: String,
    #[serde(rename = "6")]
    pub creator: String,
    #[serde(rename = "8", deserialize_with = "nested")]
    pub offer: Option<Offer>,
    #[serde(rename = "13", deserialize_with = "nested")]
    pub details: DocumentDetails,
    #[serde(rename = "14", deserialize_with = "nested")]
    pub aggregate_rating: Option<AggregateRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(rename = "1")]
    pub micros: i64,
    /// Display price, e.g. `$0.99`. Empty for free apps.
    #[serde(rename = "2")]
    pub formatted_amount: String,
    #[serde(rename = "3")]
    pub currency_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentDetails {
    #[serde(rename = "1", deserialize_with = "nested")]
    pub app_details: AppDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppDetails {
    #[serde(rename = "1")]
    pub developer_name: String,
    #[serde(rename = "3")]
    pub version_code: i32,
    #[serde(rename = "4")]
    pub version_string: String,
    /// Size in bytes.
    #[serde(rename = "9")]
    pub installation_size: i64,
    #[serde(rename = "10", deserialize_with = "one_or_many")]
    pub permissions: Vec<String>,
    #[serde(rename = "13")]
    pub num_downloads: String,
    #[serde(rename = "14")]
    pub package_name: String,
    #[serde(rename = "16")]
    pub upload_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregateRating {
    #[serde(rename = "2", deserialize_with = "float_bits")]
    pub star_rating: f32,
    #[serde(rename = "3")]
    pub ratings_count: u64,
    #[serde(rename = "4")]
    pub one_star_ratings: u64,
    #[serde(rename = "5")]
    pub two_star_ratings: u64,
    #[serde(rename = "6")]
    pub three_star_ratings: u64,
    #[serde(rename = "7")]
    pub four_star_ratings: u64,
    #[serde(rename = "8")]
    pub five_star_ratings: u64,
}

impl AggregateRating {
    /// Rating counts per star bucket, one star first.
    pub fn histogram(&self) -> [u64; 5] {
        [
            self.one_star_ratings,
            self.two_star_ratings,
            self.three_star_ratings,
            self.four_star_ratings,
            self.five_star_ratings,
        ]
    }
}

impl Details {
    fn app(&self) -> &AppDetails {
        &self.doc.details.app_details
    }

    pub fn title(&self) -> &str {
        &self.doc.title
    }

    pub fn creator(&self) -> &str {
        &self.doc.creator
    }

    pub fn developer_name(&self) -> &str {
        &self.app().developer_name
    }

    pub fn version_code(&self) -> i32 {
        self.app().version_code
    }

    pub fn version(&self) -> &str {
        &self.app().version_string
    }

    pub fn installation_size(&self) -> i64 {
        self.app().installation_size
    }

    /// Installation size scaled to `B`/`kB`/`MB`/`GB`.
    pub fn size(&self) -> String {
        format_size(u64::try_from(self.installation_size()).unwrap_or(0))
    }

    /// Display price, `$0` when the app is free or carries no offer.
    pub fn price(&self) -> String {
        let raw = self
            .doc
            .offer
            .as_ref()
            .map(|offer| offer.formatted_amount.as_str())
            .unwrap_or("");
        format_amount(raw).to_string()
    }

    pub fn rating(&self) -> Option<&AggregateRating> {
        self.doc.aggregate_rating.as_ref()
    }

    pub fn permissions(&self) -> &[String] {
        &self.app().permissions
    }

    pub fn package_name(&self) -> &str {
        &self.app().package_name
    }

    pub fn num_downloads(&self) -> &str {
        &self.app().num_downloads
    }

    pub fn upload_date(&self) -> &str {
        &self.app().upload_date
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title())?;
        writeln!(f, "Creator: {}", self.creator())?;
        writeln!(f, "Upload Date: {}", self.upload_date())?;
        writeln!(f, "Version: {}", self.version())?;
        writeln!(f, "Version Code: {}", self.version_code())?;
        writeln!(f, "Installation Size: {}", self.size())?;
        writeln!(f, "Downloads: {}", self.num_downloads())?;
        if let Some(rating) = self.rating() {
            writeln!(
                f,
                "Rating: {:.2} ({} ratings)",
                rating.star_rating, rating.ratings_count
            )?;
        }
        let currency = self
            .doc
            .offer
            .as_ref()
            .map(|offer| offer.currency_code.as_str())
            .unwrap_or("");
        write!(f, "Offer: {} {}", self.price(), currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_is_one_star_first() {
        let rating: AggregateRating =
            serde_json::from_str(r#"{"4": 1, "5": 2, "6": 3, "7": 4, "8": 5}"#).unwrap();
        assert_eq!(rating.histogram(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn star_rating_from_fixed32_bits() {
        let json = format!(r#"{{"2": {}}}"#, 4.5f32.to_bits());
        let rating: AggregateRating = serde_json::from_str(&json).unwrap();
        assert_eq!(rating.star_rating, 4.5);
    }

    #[test]
    fn single_permission_is_a_list() {
        let app: AppDetails = serde_json::from_str(r#"{"10": "android.permission.INTERNET"}"#).unwrap();
        assert_eq!(app.permissions, ["android.permission.INTERNET"]);
    }

    #[test]
    fn free_app_price() {
        let details = Details::default();
        assert_eq!(details.price(), "$0");
        assert!(details.rating().is_none());
        assert_eq!(details.size(), "0.000 B");
    }

    #[test]
    fn display_summary() {
        let details: Details = serde_json::from_str(
            r#"{"4": {"5": "Paid", "6": "Dev", "8": {"2": "$0.99", "3": "USD"},
                "13": {"1": {"3": 7, "4": "2.0", "9": 1500000, "13": "1,000+", "16": "Feb 1, 2022"}}}}"#,
        )
        .unwrap();
        assert_eq!(
            details.to_string(),
            "Title: Paid\n\
             Creator: Dev\n\
             Upload Date: Feb 1, 2022\n\
             Version: 2.0\n\
             Version Code: 7\n\
             Installation Size: 1.500 MB\n\
             Downloads: 1,000+\n\
             Offer: $0.99 USD"
        );
    }
}
