use chrono::Utc;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use models::{category, news};

use crate::{errors::ServiceError, pagination::Page, store};

/// Fields accepted when creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

/// Partial update: only supplied fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

/// List categories in insertion order.
pub async fn list_categories(
    db: &DatabaseConnection,
    page: Page,
) -> Result<Vec<category::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    store::get_objects::<category::Entity, _>(db, offset, limit).await
}

/// Get category by id.
pub async fn get_category(db: &DatabaseConnection, id: i32) -> Result<category::Model, ServiceError> {
    store::get_object::<category::Entity, _, _>(db, category::Column::Id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("category"))
}

/// Create a category.
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model, ServiceError> {
    category::validate_name(&input.name)?;
    let am = category::ActiveModel {
        name: Set(input.name),
        created: Set(Utc::now().into()),
        ..Default::default()
    };
    store::create_object(db, am).await
}

/// Full and partial update both land here; an empty patch returns the
/// record unchanged. `created` is never touched.
pub async fn update_category(
    db: &DatabaseConnection,
    id: i32,
    patch: CategoryPatch,
) -> Result<category::Model, ServiceError> {
    let existing = get_category(db, id).await?;
    let Some(name) = patch.name else { return Ok(existing) };
    category::validate_name(&name)?;
    let mut am = existing.into_active_model();
    am.name = Set(name);
    store::update_object(db, am).await
}

/// Delete a category. Restrict policy: deletion is rejected while news
/// rows still reference it.
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = get_category(db, id).await?;
    let dependents =
        store::get_objects_by::<news::Entity, _, _>(db, news::Column::CategoryId, id, 0, 1).await?;
    if !dependents.is_empty() {
        return Err(ServiceError::Conflict("category has dependent news".into()));
    }
    store::delete_object(db, existing.into_active_model()).await
}
