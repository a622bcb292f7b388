use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, TransactionTrait};
use tracing::debug;

use models::system;

use crate::errors::ServiceError;
use crate::system::repository::{EntityMerge, SystemRepository};

/// SeaORM-backed repository. Writes run in an explicit transaction that is committed only
/// after every step succeeds; an early return drops the transaction, which rolls it back.
#[derive(Clone)]
pub struct SeaOrmSystemRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSystemRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SystemRepository for SeaOrmSystemRepository {
    async fn find_all(&self) -> Result<Vec<system::Model>, ServiceError> {
        let rows = system::Entity::find()
            .order_by_asc(system::Column::SystemId)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, system_id: i32) -> Result<Option<system::Model>, ServiceError> {
        Ok(system::Entity::find_by_id(system_id).one(&self.db).await?)
    }

    async fn insert(&self, record: system::Model) -> Result<system::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let stored = system::create(&txn, &record.name).await?;
        txn.commit().await?;
        debug!(system_id = stored.system_id, "system row inserted");
        Ok(stored)
    }

    async fn update_with(&self, system_id: i32, merge: EntityMerge) -> Result<Option<system::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        // SELECT ... FOR UPDATE: concurrent writers to the same row queue behind this transaction
        let Some(mut row) = system::Entity::find_by_id(system_id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };
        merge(&mut row);
        row.system_id = system_id;
        let stored = system::save_changes(&txn, row).await?;
        txn.commit().await?;
        debug!(system_id, "system row updated");
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_repository_insert_update_read() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmSystemRepository::new(db);

        let name = format!("repo_{}", uuid::Uuid::new_v4());
        let created = repo.insert(system::Model { system_id: -1, name: name.clone() }).await?;
        assert!(created.system_id > 0);
        assert_eq!(repo.find_by_id(created.system_id).await?, Some(created.clone()));

        let updated = repo
            .update_with(created.system_id, Box::new(|m: &mut system::Model| m.name.push_str("_v2")))
            .await?
            .expect("row exists");
        assert_eq!(updated.system_id, created.system_id);
        assert_eq!(updated.name, format!("{}_v2", name));

        let all = repo.find_all().await?;
        assert!(all.windows(2).all(|w| w[0].system_id < w[1].system_id));
        assert!(all.iter().any(|m| m.system_id == created.system_id));
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_update_missing_row() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmSystemRepository::new(db);
        let res = repo.update_with(i32::MAX, Box::new(|m: &mut system::Model| m.name = "ghost".into())).await?;
        assert!(res.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_failed_update_rolls_back() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmSystemRepository::new(db);
        let created = repo.insert(system::Model { system_id: 0, name: format!("rb_{}", uuid::Uuid::new_v4()) }).await?;

        let err = repo.update_with(created.system_id, Box::new(|m: &mut system::Model| m.name.clear())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.find_by_id(created.system_id).await?, Some(created));
        Ok(())
    }
}
