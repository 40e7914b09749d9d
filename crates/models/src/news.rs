use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const TITLE_MAX_LEN: usize = 100;

/// Ordered list of stored file references attached to a news record.
/// Persisted as a JSON column so the schema works on both Postgres and SQLite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub images: Option<ImageList>,
    pub created: DateTimeWithTimeZone,
    pub updated: DateTimeWithTimeZone,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
    Comments,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(crate::category::Entity)
                .from(Column::CategoryId)
                .to(crate::category::Column::Id)
                .into(),
            Relation::Comments => Entity::has_many(crate::comment::Entity).into(),
        }
    }
}

impl Related<crate::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ModelError::Validation(format!("title longer than {TITLE_MAX_LEN} characters")));
    }
    Ok(())
}
