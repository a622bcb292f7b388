use async_trait::async_trait;
use models::system;

use crate::errors::ServiceError;

/// In-place change applied to a locked row during an update.
pub type EntityMerge = Box<dyn FnOnce(&mut system::Model) + Send>;

/// Repository abstraction for the `system` table.
///
/// Each write is its own atomic unit: either the whole operation is visible afterwards or none of it.
#[async_trait]
pub trait SystemRepository: Send + Sync {
    /// All rows ordered by ascending key.
    async fn find_all(&self) -> Result<Vec<system::Model>, ServiceError>;

    async fn find_by_id(&self, system_id: i32) -> Result<Option<system::Model>, ServiceError>;

    /// Insert `record` and return it as stored. The key carried by `record` is ignored.
    async fn insert(&self, record: system::Model) -> Result<system::Model, ServiceError>;

    /// Load the row for `system_id`, apply `merge`, persist and return the stored row.
    /// `Ok(None)` when there is no such row; nothing is written in that case.
    async fn update_with(&self, system_id: i32, merge: EntityMerge) -> Result<Option<system::Model>, ServiceError>;
}

/// In-memory repository for tests and doc examples.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Table {
        rows: BTreeMap<i32, system::Model>,
        last_id: i32,
    }

    /// Keys start at 1 and are never handed out twice, mirroring an identity column.
    #[derive(Default)]
    pub struct InMemorySystemRepository {
        table: Mutex<Table>,
    }

    impl InMemorySystemRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn len(&self) -> usize {
            self.table.lock().await.rows.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    #[async_trait]
    impl SystemRepository for InMemorySystemRepository {
        async fn find_all(&self) -> Result<Vec<system::Model>, ServiceError> {
            let table = self.table.lock().await;
            Ok(table.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, system_id: i32) -> Result<Option<system::Model>, ServiceError> {
            let table = self.table.lock().await;
            Ok(table.rows.get(&system_id).cloned())
        }

        async fn insert(&self, record: system::Model) -> Result<system::Model, ServiceError> {
            system::validate_name(&record.name)?;
            let mut table = self.table.lock().await;
            table.last_id += 1;
            let stored = system::Model { system_id: table.last_id, name: record.name };
            table.rows.insert(stored.system_id, stored.clone());
            Ok(stored)
        }

        async fn update_with(&self, system_id: i32, merge: EntityMerge) -> Result<Option<system::Model>, ServiceError> {
            let mut table = self.table.lock().await;
            let Some(current) = table.rows.get(&system_id) else { return Ok(None) };
            // work on a copy so a rejected change leaves the row untouched
            let mut changed = current.clone();
            merge(&mut changed);
            changed.system_id = system_id;
            system::validate_name(&changed.name)?;
            table.rows.insert(system_id, changed.clone());
            Ok(Some(changed))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn named(name: &str) -> system::Model {
            system::Model { system_id: 0, name: name.into() }
        }

        #[tokio::test]
        async fn keys_are_sequential_and_ignore_input() {
            let repo = InMemorySystemRepository::new();
            let a = repo.insert(system::Model { system_id: 77, name: "a".into() }).await.unwrap();
            let b = repo.insert(named("b")).await.unwrap();
            assert_eq!((a.system_id, b.system_id), (1, 2));
            let ids: Vec<i32> = repo.find_all().await.unwrap().iter().map(|m| m.system_id).collect();
            assert_eq!(ids, vec![1, 2]);
        }

        #[tokio::test]
        async fn update_of_missing_row_writes_nothing() {
            let repo = InMemorySystemRepository::new();
            let res = repo.update_with(5, Box::new(|m: &mut system::Model| m.name = "x".into())).await.unwrap();
            assert!(res.is_none());
            assert!(repo.is_empty().await);
        }

        #[tokio::test]
        async fn rejected_update_leaves_row_untouched() {
            let repo = InMemorySystemRepository::new();
            let a = repo.insert(named("keep")).await.unwrap();
            let err = repo.update_with(a.system_id, Box::new(|m: &mut system::Model| m.name.clear())).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
            assert_eq!(repo.find_by_id(a.system_id).await.unwrap(), Some(a));
        }

        #[tokio::test]
        async fn merge_cannot_change_key() {
            let repo = InMemorySystemRepository::new();
            let a = repo.insert(named("a")).await.unwrap();
            let updated = repo
                .update_with(a.system_id, Box::new(|m: &mut system::Model| { m.system_id = 40; m.name = "b".into(); }))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated, system::Model { system_id: a.system_id, name: "b".into() });
            assert!(repo.find_by_id(40).await.unwrap().is_none());
        }
    }
}
