//! Restaurant table domain model.

use serde::{Deserialize, Serialize};

/// A physical table with its QR menu link. Numbers are unique per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub tenant_id: String,
    pub number: i32,
    /// Optional nickname.
    pub name: String,
    pub section: String,
    pub capacity: Option<i32>,
    /// `active` or `inactive`.
    pub status: String,
    pub qr_code_url: String,
    pub qr_generated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Build the QR target URL for a table.
///
/// Format: `https://menu.tabletap.space/{slug}/{number}`. The image itself
/// is rendered client-side from this URL.
pub fn qr_code_url(restaurant_slug: &str, number: i32) -> String {
    format!("https://menu.tabletap.space/{restaurant_slug}/{number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_url_format() {
        assert_eq!(
            qr_code_url("mama-k", 12),
            "https://menu.tabletap.space/mama-k/12"
        );
    }
}
