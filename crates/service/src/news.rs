use chrono::Utc;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{category, comment, news};

use crate::{errors::ServiceError, media::MediaStore, pagination::Page, store};

/// Fields accepted on create and full update. `images` holds stored file
/// references produced by the media store, never raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsInput {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    pub category_id: i32,
}

/// List news in insertion order.
pub async fn list_news(db: &DatabaseConnection, page: Page) -> Result<Vec<news::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    store::get_objects::<news::Entity, _>(db, offset, limit).await
}

/// Get news by id.
pub async fn get_news(db: &DatabaseConnection, id: i32) -> Result<news::Model, ServiceError> {
    store::get_object::<news::Entity, _, _>(db, news::Column::Id, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("news"))
}

async fn ensure_category_exists(db: &DatabaseConnection, category_id: i32) -> Result<(), ServiceError> {
    let found =
        store::get_object::<category::Entity, _, _>(db, category::Column::Id, category_id).await?;
    if found.is_none() {
        return Err(ServiceError::Validation(format!("category {category_id} does not exist")));
    }
    Ok(())
}

/// Create a news record. The referenced category must exist.
pub async fn create_news(db: &DatabaseConnection, input: NewsInput) -> Result<news::Model, ServiceError> {
    news::validate_title(&input.title)?;
    ensure_category_exists(db, input.category_id).await?;
    let now = Utc::now().into();
    let am = news::ActiveModel {
        title: Set(input.title),
        content: Set(input.content),
        images: Set(input.images.map(news::ImageList)),
        created: Set(now),
        updated: Set(now),
        category_id: Set(input.category_id),
        ..Default::default()
    };
    store::create_object(db, am).await
}

/// Full update: supplied fields are applied, `updated` is refreshed, and
/// `images` replaces the stored list outright (replace, don't append).
pub async fn update_news(
    db: &DatabaseConnection,
    id: i32,
    input: NewsInput,
) -> Result<news::Model, ServiceError> {
    let existing = get_news(db, id).await?;
    news::validate_title(&input.title)?;
    if input.category_id != existing.category_id {
        ensure_category_exists(db, input.category_id).await?;
    }
    let mut am = existing.into_active_model();
    am.title = Set(input.title);
    am.content = Set(input.content);
    am.images = Set(input.images.map(news::ImageList));
    am.category_id = Set(input.category_id);
    am.updated = Set(Utc::now().into());
    store::update_object(db, am).await
}

/// Store one uploaded file and make it the article's only image reference.
pub async fn attach_image(
    db: &DatabaseConnection,
    media: &MediaStore,
    id: i32,
    filename_hint: &str,
    bytes: &[u8],
) -> Result<news::Model, ServiceError> {
    let existing = get_news(db, id).await?;
    let reference = media.save(filename_hint, bytes).await?;
    let mut am = existing.into_active_model();
    am.images = Set(Some(news::ImageList(vec![reference])));
    am.updated = Set(Utc::now().into());
    store::update_object(db, am).await
}

/// Delete a news record together with its comments, then best-effort remove
/// its stored image files.
///
/// Comments and the news row go in one transaction, so a deleted news never
/// leaves an orphaned comment. File removal failures are logged inside
/// [`MediaStore::remove`] and swallowed; the delete never fails because a
/// referenced file is already gone.
pub async fn delete_news(
    db: &DatabaseConnection,
    media: &MediaStore,
    id: i32,
) -> Result<(), ServiceError> {
    let existing = get_news(db, id).await?;
    let image_refs = existing.images.clone().map(|list| list.0).unwrap_or_default();

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let removed =
        store::delete_objects::<comment::Entity, _, _>(&txn, comment::Column::NewsId, id).await?;
    store::delete_object(&txn, existing.into_active_model()).await?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(news_id = id, comments_removed = removed, "news deleted");

    for reference in &image_refs {
        media.remove(reference).await;
    }
    Ok(())
}
