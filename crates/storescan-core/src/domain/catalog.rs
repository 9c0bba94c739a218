//! CatalogRecord - デコード済みのカタログエントリ
//!
//! 1 つの Valuation Worker だけが所有し、worker の終了とともに破棄される。

use chrono::NaiveDateTime;

/// One decoded catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    pub price: f64,
    pub score: f64,
    /// Opaque tag carried by the catalog; not interpreted here.
    pub entity: i64,
    pub last_modified: Option<NaiveDateTime>,
}

impl CatalogRecord {
    /// `price × score × quantity`
    pub fn contribution(&self, quantity: u32) -> f64 {
        self.price * self.score * f64::from(quantity)
    }
}
