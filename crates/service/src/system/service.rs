use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use super::domain::System;
use super::mapper::{BaseMapper, SystemMapper};
use super::repository::{EntityMerge, SystemRepository};

/// Read/write orchestration for systems, independent of the web framework.
pub struct SystemService<R: SystemRepository + ?Sized> {
    repo: Arc<R>,
    mapper: SystemMapper,
}

impl<R: SystemRepository + ?Sized> SystemService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self::with_mapper(repo, SystemMapper) }

    pub fn with_mapper(repo: Arc<R>, mapper: SystemMapper) -> Self { Self { repo, mapper } }

    /// Every stored system, ordered by `system_id`.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<System>, ServiceError> {
        let rows = self.repo.find_all().await?;
        Ok(self.mapper.to_domain_list(&rows))
    }

    /// `Ok(None)` when nothing is stored under `system_id`.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, system_id: i32) -> Result<Option<System>, ServiceError> {
        let found = self.repo.find_by_id(system_id).await?;
        Ok(found.map(|row| self.mapper.to_domain(&row)))
    }

    /// Persist a new system. Any `system_id` already on `system` is discarded; on return it holds
    /// the identifier the store assigned.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::system::{System, SystemService, repository::memory::InMemorySystemRepository};
    /// let svc = SystemService::new(Arc::new(InMemorySystemRepository::new()));
    /// let mut system = System::new("Alpha");
    /// tokio_test::block_on(svc.save(&mut system)).unwrap();
    /// assert_eq!(system.system_id, Some(1));
    /// ```
    #[instrument(skip(self, system), fields(name = %system.name))]
    pub async fn save(&self, system: &mut System) -> Result<(), ServiceError> {
        debug!(?system, "saving system");
        system.validate()?;
        let entity = self.mapper.to_entity(system);
        let stored = self.repo.insert(entity).await?;
        self.mapper.update_domain(&stored, system);
        info!(system_id = stored.system_id, "system_created");
        Ok(())
    }

    /// Replace the fields of an existing system. On return `system` mirrors the stored row.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::errors::ServiceError;
    /// use service::system::{System, SystemService, repository::memory::InMemorySystemRepository};
    /// let svc = SystemService::new(Arc::new(InMemorySystemRepository::new()));
    /// let mut unsaved = System::new("Alpha");
    /// let err = tokio_test::block_on(svc.update(&mut unsaved)).unwrap_err();
    /// assert!(matches!(err, ServiceError::MissingId));
    /// ```
    #[instrument(skip(self, system), fields(system_id = ?system.system_id))]
    pub async fn update(&self, system: &mut System) -> Result<(), ServiceError> {
        debug!(?system, "updating system");
        system.validate()?;
        let system_id = system.system_id.ok_or(ServiceError::MissingId)?;

        let mapper = self.mapper;
        let incoming = system.clone();
        let merge: EntityMerge = Box::new(move |entity: &mut models::system::Model| mapper.update_entity(&incoming, entity));
        let stored = self
            .repo
            .update_with(system_id, merge)
            .await?
            .ok_or_else(|| ServiceError::system_not_found(system_id))?;

        self.mapper.update_domain(&stored, system);
        info!(system_id, "system_updated");
        Ok(())
    }
}
