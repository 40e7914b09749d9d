use chrono::Utc;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{comment, news};

use crate::{errors::ServiceError, pagination::Page, store};

/// Fields accepted when creating a comment. The author is never part of
/// the input; it is the resolved caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInput {
    pub content: String,
    pub news_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPatch {
    pub content: String,
}

/// List comments, optionally filtered by news id.
pub async fn list_comments(
    db: &DatabaseConnection,
    news_id: Option<i32>,
    page: Page,
) -> Result<Vec<comment::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    match news_id {
        Some(nid) => {
            store::get_objects_by::<comment::Entity, _, _>(
                db,
                comment::Column::NewsId,
                nid,
                offset,
                limit,
            )
            .await
        }
        None => store::get_objects::<comment::Entity, _>(db, offset, limit).await,
    }
}

/// Get comment by id.
pub async fn get_comment(db: &DatabaseConnection, id: i32) -> Result<comment::Model, ServiceError> {
    store::get_object::<comment::Entity, _, _>(db, comment::Column::Id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("comment"))
}

/// Create a comment authored by `author`.
pub async fn create_comment(
    db: &DatabaseConnection,
    input: CommentInput,
    author: Uuid,
) -> Result<comment::Model, ServiceError> {
    comment::validate_content(&input.content)?;
    let target =
        store::get_object::<news::Entity, _, _>(db, news::Column::Id, input.news_id).await?;
    if target.is_none() {
        return Err(ServiceError::Validation(format!("news {} does not exist", input.news_id)));
    }
    let now = Utc::now().into();
    let am = comment::ActiveModel {
        content: Set(input.content),
        created: Set(now),
        updated: Set(now),
        news_id: Set(input.news_id),
        user_id: Set(author),
        ..Default::default()
    };
    store::create_object(db, am).await
}

/// Update a comment. Only the author may mutate it.
pub async fn update_comment(
    db: &DatabaseConnection,
    id: i32,
    patch: CommentPatch,
    caller: Uuid,
) -> Result<comment::Model, ServiceError> {
    let existing = get_comment(db, id).await?;
    if existing.user_id != caller {
        return Err(ServiceError::Forbidden("not the comment author".into()));
    }
    comment::validate_content(&patch.content)?;
    let mut am = existing.into_active_model();
    am.content = Set(patch.content);
    am.updated = Set(Utc::now().into());
    store::update_object(db, am).await
}

/// Delete a comment. Only the author may remove it.
pub async fn delete_comment(
    db: &DatabaseConnection,
    id: i32,
    caller: Uuid,
) -> Result<(), ServiceError> {
    let existing = get_comment(db, id).await?;
    if existing.user_id != caller {
        return Err(ServiceError::Forbidden("not the comment author".into()));
    }
    store::delete_object(db, existing.into_active_model()).await
}
