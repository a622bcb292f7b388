use sea_orm::{entity::prelude::*, ActiveValue::{NotSet, Set, Unchanged}, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Storage representation of a system. `system_id` is assigned by the identity column.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub system_id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.is_empty() {
        return Err(errors::ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// Insert a new row; the key is always left to the database.
pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        system_id: NotSet,
        name: Set(name.to_string()),
    };
    Ok(am.insert(db).await?)
}

/// Write every non-key column of `changed` to the row it identifies.
pub async fn save_changes<C: ConnectionTrait>(db: &C, changed: Model) -> Result<Model, errors::ModelError> {
    validate_name(&changed.name)?;
    let am = ActiveModel {
        system_id: Unchanged(changed.system_id),
        name: Set(changed.name),
    };
    Ok(am.update(db).await?)
}
