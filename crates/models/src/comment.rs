use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const CONTENT_MAX_LEN: usize = 1000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub content: String,
    pub created: DateTimeWithTimeZone,
    pub updated: DateTimeWithTimeZone,
    pub news_id: i32,
    pub user_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    News,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::News => Entity::belongs_to(crate::news::Entity)
                .from(Column::NewsId)
                .to(crate::news::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::news::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::News.def()
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_content(content: &str) -> Result<(), ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("content required".into()));
    }
    if content.chars().count() > CONTENT_MAX_LEN {
        return Err(ModelError::Validation(format!(
            "content longer than {CONTENT_MAX_LEN} characters"
        )));
    }
    Ok(())
}
