//! Lead management service.

use chrono::Utc;
use painel_types::error::{LeadError, RepositoryError};
use painel_types::lead::{CreateLeadRequest, Lead, LeadId, UpdateLeadRequest};

use crate::repository::lead::{LeadFilter, LeadRepository};
use crate::service::{clean, patch};

const REQUIRED_FIELDS: &str = "name and contact are required";

fn storage(e: RepositoryError) -> LeadError {
    LeadError::StorageError(e.to_string())
}

/// CRUD over leads with the admin panel's validation rules.
pub struct LeadService<L: LeadRepository> {
    repo: L,
}

impl<L: LeadRepository> LeadService<L> {
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    /// Register a lead. Name and contact must both be non-blank.
    pub async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, LeadError> {
        let name = request.name.trim().to_string();
        let contact = request.contact.trim().to_string();
        if name.is_empty() || contact.is_empty() {
            return Err(LeadError::Validation(REQUIRED_FIELDS.to_string()));
        }

        let lead = Lead {
            id: LeadId::new(),
            name,
            contact: Some(contact),
            document: clean(request.document),
            status: request.status.unwrap_or_default(),
            email: clean(request.email),
            street: clean(request.street),
            number: clean(request.number),
            district: clean(request.district),
            city: clean(request.city),
            state: clean(request.state),
            postal_code: clean(request.postal_code),
            created_at: Utc::now(),
        };

        let created = self.repo.create(&lead).await.map_err(storage)?;
        tracing::info!(lead = %created.id, "lead created");
        Ok(created)
    }

    pub async fn get_lead(&self, id: &LeadId) -> Result<Lead, LeadError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(LeadError::NotFound)
    }

    pub async fn list_leads(&self, filter: Option<LeadFilter>) -> Result<Vec<Lead>, LeadError> {
        self.repo.list(filter).await.map_err(storage)
    }

    /// Update a lead. Name and contact stay mandatory; other fields change
    /// only when provided.
    pub async fn update_lead(&self, id: &LeadId, request: UpdateLeadRequest) -> Result<Lead, LeadError> {
        let name = request.name.trim().to_string();
        let contact = request.contact.trim().to_string();
        if name.is_empty() || contact.is_empty() {
            return Err(LeadError::Validation(REQUIRED_FIELDS.to_string()));
        }

        let mut lead = self.get_lead(id).await?;
        lead.name = name;
        lead.contact = Some(contact);
        if let Some(status) = request.status {
            lead.status = status;
        }
        patch(&mut lead.document, request.document);
        patch(&mut lead.email, request.email);
        patch(&mut lead.street, request.street);
        patch(&mut lead.number, request.number);
        patch(&mut lead.district, request.district);
        patch(&mut lead.city, request.city);
        patch(&mut lead.state, request.state);
        patch(&mut lead.postal_code, request.postal_code);

        self.repo.update(&lead).await.map_err(|e| match e {
            RepositoryError::NotFound => LeadError::NotFound,
            other => storage(other),
        })
    }

    pub async fn delete_lead(&self, id: &LeadId) -> Result<(), LeadError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => LeadError::NotFound,
            other => storage(other),
        })?;
        tracing::info!(lead = %id, "lead deleted");
        Ok(())
    }

    pub async fn count_leads(&self) -> Result<i64, LeadError> {
        self.repo.count().await.map_err(storage)
    }
}
