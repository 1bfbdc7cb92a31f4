//! Strongly-typed entity identifiers.
//!
//! Every record owned by the admin backend is keyed by a UUID. Wrapping each
//! one in its own newtype keeps a `LeadId` from being passed where a
//! `CampaignId` is expected.

/// Declare a UUID newtype with the usual conversions.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-sortable).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

entity_id!(
    /// Identifier of a lead (cliente).
    LeadId
);
entity_id!(
    /// Identifier of a vendor (vendedor).
    VendorId
);
entity_id!(
    /// Identifier of a catalog product.
    ProductId
);
entity_id!(
    /// Identifier of a marketing campaign.
    CampaignId
);
entity_id!(
    /// Identifier of a single per-recipient send record.
    SendId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_parse() {
        let id = LeadId::new();
        let parsed: LeadId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<CampaignId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = VendorId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
