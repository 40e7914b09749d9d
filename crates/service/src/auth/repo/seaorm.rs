use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use models::{user, user_credentials};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::store;

/// SeaORM-backed repository; record access funnels through the store.
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = store::get_object::<user::Entity, _, _>(&self.db, user::Column::Email, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| AuthUser { id: u.id, email: u.email, name: u.name }))
    }

    async fn create_user(&self, email: &str, name: &str) -> Result<AuthUser, AuthError> {
        user::validate_email(email).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_name(name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let am = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let created = store::create_object(&self.db, am)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(AuthUser { id: created.id, email: created.email, name: created.name })
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = store::get_object::<user_credentials::Entity, _, _>(
            &self.db,
            user_credentials::Column::UserId,
            user_id,
        )
        .await
        .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        if password_hash.trim().is_empty() {
            return Err(AuthError::Validation("password hash required".into()));
        }
        let now = Utc::now().into();
        let existing = store::get_object::<user_credentials::Entity, _, _>(
            &self.db,
            user_credentials::Column::UserId,
            user_id,
        )
        .await
        .map_err(|e| AuthError::Repository(e.to_string()))?;

        let saved = match existing {
            Some(current) => {
                let mut am: user_credentials::ActiveModel = current.into();
                am.password_hash = Set(password_hash);
                am.password_algorithm = Set(password_algorithm);
                am.updated_at = Set(now);
                store::update_object(&self.db, am).await
            }
            None => {
                let am = user_credentials::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    password_hash: Set(password_hash),
                    password_algorithm: Set(password_algorithm),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                store::create_object(&self.db, am).await
            }
        }
        .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(Credentials {
            user_id: saved.user_id,
            password_hash: saved.password_hash,
            password_algorithm: saved.password_algorithm,
        })
    }
}
