use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::id::VendorId;

/// A vendor (vendedor): a sales representative serving a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Region served, free text ("Sertão", "Agreste", ...).
    pub region_served: Option<String>,
    /// Cities served, free text (usually comma separated).
    pub cities_served: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a vendor. Only `name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub region_served: Option<String>,
    pub cities_served: Option<String>,
}

/// Partial update of a vendor. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub region_served: Option<String>,
    pub cities_served: Option<String>,
}
