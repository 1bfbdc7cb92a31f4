//! Vendor management service.

use chrono::Utc;
use painel_types::error::{RepositoryError, VendorError};
use painel_types::vendor::{CreateVendorRequest, UpdateVendorRequest, Vendor, VendorId};

use crate::repository::vendor::{VendorFilter, VendorRepository};
use crate::service::{clean, patch};

fn storage(e: RepositoryError) -> VendorError {
    VendorError::StorageError(e.to_string())
}

pub struct VendorService<V: VendorRepository> {
    repo: V,
}

impl<V: VendorRepository> VendorService<V> {
    pub fn new(repo: V) -> Self {
        Self { repo }
    }

    pub async fn create_vendor(&self, request: CreateVendorRequest) -> Result<Vendor, VendorError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(VendorError::Validation("name is required".to_string()));
        }

        let vendor = Vendor {
            id: VendorId::new(),
            name,
            phone: clean(request.phone),
            email: clean(request.email),
            address: clean(request.address),
            region_served: clean(request.region_served),
            cities_served: clean(request.cities_served),
            created_at: Utc::now(),
        };

        let created = self.repo.create(&vendor).await.map_err(storage)?;
        tracing::info!(vendor = %created.id, "vendor created");
        Ok(created)
    }

    pub async fn get_vendor(&self, id: &VendorId) -> Result<Vendor, VendorError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(VendorError::NotFound)
    }

    pub async fn list_vendors(&self, filter: Option<VendorFilter>) -> Result<Vec<Vendor>, VendorError> {
        self.repo.list(filter).await.map_err(storage)
    }

    /// Apply a partial update. The name may change but never to blank.
    pub async fn update_vendor(
        &self,
        id: &VendorId,
        request: UpdateVendorRequest,
    ) -> Result<Vendor, VendorError> {
        let mut vendor = self.get_vendor(id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(VendorError::Validation("name cannot be empty".to_string()));
            }
            vendor.name = name;
        }
        patch(&mut vendor.phone, request.phone);
        patch(&mut vendor.email, request.email);
        patch(&mut vendor.address, request.address);
        patch(&mut vendor.region_served, request.region_served);
        patch(&mut vendor.cities_served, request.cities_served);

        self.repo.update(&vendor).await.map_err(|e| match e {
            RepositoryError::NotFound => VendorError::NotFound,
            other => storage(other),
        })
    }

    pub async fn delete_vendor(&self, id: &VendorId) -> Result<(), VendorError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => VendorError::NotFound,
            other => storage(other),
        })?;
        tracing::info!(vendor = %id, "vendor deleted");
        Ok(())
    }

    pub async fn count_vendors(&self) -> Result<i64, VendorError> {
        self.repo.count().await.map_err(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryVendors;

    fn request(name: &str) -> CreateVendorRequest {
        CreateVendorRequest {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let svc = VendorService::new(InMemoryVendors::default());
        let err = svc.create_vendor(request("  ")).await.unwrap_err();
        assert!(matches!(err, VendorError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_ordered_by_name_with_search() {
        let svc = VendorService::new(InMemoryVendors::default());
        svc.create_vendor(CreateVendorRequest {
            region_served: Some("Sertão".to_string()),
            ..request("Carlos")
        })
        .await
        .unwrap();
        svc.create_vendor(request("Ana")).await.unwrap();

        let all = svc.list_vendors(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Carlos"]);

        let sertao = svc
            .list_vendors(Some(VendorFilter {
                search: Some("sertão".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(sertao.len(), 1);
        assert_eq!(sertao[0].name, "Carlos");
    }

    #[tokio::test]
    async fn test_update_partial() {
        let svc = VendorService::new(InMemoryVendors::default());
        let vendor = svc
            .create_vendor(CreateVendorRequest {
                phone: Some("87 98888-7777".to_string()),
                ..request("Carlos")
            })
            .await
            .unwrap();

        let updated = svc
            .update_vendor(
                &vendor.id,
                UpdateVendorRequest {
                    cities_served: Some("Arcoverde, Sertânia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Carlos");
        assert_eq!(updated.phone.as_deref(), Some("87 98888-7777"));
        assert_eq!(updated.cities_served.as_deref(), Some("Arcoverde, Sertânia"));

        let err = svc
            .update_vendor(
                &vendor.id,
                UpdateVendorRequest {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VendorError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let svc = VendorService::new(InMemoryVendors::default());
        let err = svc.delete_vendor(&VendorId::new()).await.unwrap_err();
        assert!(matches!(err, VendorError::NotFound));
        assert_eq!(svc.count_vendors().await.unwrap(), 0);
    }
}
