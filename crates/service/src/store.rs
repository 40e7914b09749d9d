//! Generic object store: one reusable data-access surface so the entity
//! services do not each reimplement record lookup and mutation.
//!
//! Every function is generic over [`ConnectionTrait`], so callers choose
//! durability: pass the pooled connection for an immediately committed
//! statement, or a [`sea_orm::DatabaseTransaction`] to leave the write
//! pending for the outer transaction.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Value,
};

use crate::errors::ServiceError;

/// Entities managed through the store expose the column reflecting
/// insertion order, keeping list pages stable across calls.
pub trait StoreEntity: EntityTrait {
    fn order_column() -> Self::Column;
}

impl StoreEntity for models::category::Entity {
    fn order_column() -> Self::Column { models::category::Column::Id }
}

impl StoreEntity for models::news::Entity {
    fn order_column() -> Self::Column { models::news::Column::Id }
}

impl StoreEntity for models::comment::Entity {
    fn order_column() -> Self::Column { models::comment::Column::Id }
}

/// Single record by field/value. Zero matches is `Ok(None)`, not an error.
/// Fields assumed unique with multiple matches yield the first row.
pub async fn get_object<E, C, V>(
    db: &C,
    field: E::Column,
    value: V,
) -> Result<Option<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    E::find()
        .filter(field.eq(value))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Insertion-ordered page of records. `limit = 0` yields an empty page;
/// no total count is computed.
pub async fn get_objects<E, C>(db: &C, offset: u64, limit: u64) -> Result<Vec<E::Model>, ServiceError>
where
    E: StoreEntity,
    C: ConnectionTrait,
{
    E::find()
        .order_by_asc(E::order_column())
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Insertion-ordered page of records matching `field = value`.
pub async fn get_objects_by<E, C, V>(
    db: &C,
    field: E::Column,
    value: V,
    offset: u64,
    limit: u64,
) -> Result<Vec<E::Model>, ServiceError>
where
    E: StoreEntity,
    C: ConnectionTrait,
    V: Into<Value>,
{
    E::find()
        .filter(field.eq(value))
        .order_by_asc(E::order_column())
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Insert a record, returning the persisted row with server-generated
/// fields (identifier, timestamps) populated.
pub async fn create_object<A, C>(
    db: &C,
    record: A,
) -> Result<<A::Entity as EntityTrait>::Model, ServiceError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    record.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply a partial update: only `Set` fields are written, everything else
/// is left untouched. Returns the refreshed record.
pub async fn update_object<A, C>(
    db: &C,
    record: A,
) -> Result<<A::Entity as EntityTrait>::Model, ServiceError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    record.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Remove an already-loaded record. The caller-supplied object is assumed
/// to exist.
pub async fn delete_object<A, C>(db: &C, record: A) -> Result<(), ServiceError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    record.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

/// Remove all records matching `field = value`; zero matches is a no-op.
/// Returns the number of rows removed.
pub async fn delete_objects<E, C, V>(db: &C, field: E::Column, value: V) -> Result<u64, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    let res = E::delete_many()
        .filter(field.eq(value))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::Utc;
    use models::category;
    use sea_orm::Set;

    async fn seed_categories(db: &sea_orm::DatabaseConnection, n: usize) -> Vec<category::Model> {
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let am = category::ActiveModel {
                name: Set(format!("cat-{i}")),
                created: Set(Utc::now().into()),
                ..Default::default()
            };
            out.push(create_object(db, am).await.expect("insert"));
        }
        out
    }

    #[tokio::test]
    async fn get_object_returns_none_for_zero_matches() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let found =
            get_object::<category::Entity, _, _>(&db, category::Column::Name, "nope").await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_ordered() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_categories(&db, 7).await;

        let first = get_objects::<category::Entity, _>(&db, 0, 3).await?;
        let second = get_objects::<category::Entity, _>(&db, 3, 3).await?;
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        for a in &first {
            assert!(second.iter().all(|b| b.id != a.id));
        }
        // no gaps: together they cover the first six inserted rows in order
        let ids: Vec<i32> = first.iter().chain(second.iter()).map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        Ok(())
    }

    #[tokio::test]
    async fn zero_limit_yields_empty_page() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_categories(&db, 2).await;
        let page = get_objects::<category::Entity, _>(&db, 0, 0).await?;
        assert!(page.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_touches_only_set_fields() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = seed_categories(&db, 1).await.remove(0);
        let stamp = created.created;

        let mut am: category::ActiveModel = created.into();
        am.name = Set("renamed".to_string());
        let updated = update_object(&db, am).await?;
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.created, stamp);
        Ok(())
    }

    #[tokio::test]
    async fn delete_by_field_is_noop_on_zero_matches() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let removed =
            delete_objects::<category::Entity, _, _>(&db, category::Column::Id, 4242).await?;
        assert_eq!(removed, 0);
        Ok(())
    }

    #[tokio::test]
    async fn delete_object_removes_the_row() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = seed_categories(&db, 1).await.remove(0);
        let id = created.id;
        delete_object(&db, category::ActiveModel::from(created)).await?;
        let found = get_object::<category::Entity, _, _>(&db, category::Column::Id, id).await?;
        assert!(found.is_none());
        Ok(())
    }
}
