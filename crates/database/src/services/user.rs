use crate::{
    entities::users,
    error::{ServiceError, unique_violation},
    services::now,
};
use log::info;
use models::{
    enums::UserRole,
    forms::{RoleChange, Validate},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Identity asserted by a validated access token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

pub struct UserService;

impl UserService {
    /// Finds the user behind an identity, creating a student account the
    /// first time it is seen
    pub async fn provision(
        db: &DatabaseConnection,
        identity: Identity,
    ) -> Result<users::Model, DbErr> {
        if let Some(user) = Self::find_by_external_id(db, &identity.external_id).await? {
            return Self::refresh_profile(db, user, identity).await;
        }

        let timestamp = now();
        let inserted = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            external_id: Set(identity.external_id.clone()),
            email: Set(identity.email),
            name: Set(identity.name),
            role: Set(UserRole::default()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await;

        match inserted {
            Ok(user) => {
                info!("Provisioned user {} for {}", user.id, user.external_id);
                Ok(user)
            }
            // Another request provisioned the same identity first
            Err(err) if unique_violation(&err).is_some() => {
                Self::find_by_external_id(db, &identity.external_id)
                    .await?
                    .ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn refresh_profile(
        db: &DatabaseConnection,
        user: users::Model,
        identity: Identity,
    ) -> Result<users::Model, DbErr> {
        let email = identity.email.filter(|email| user.email.as_ref() != Some(email));
        let name = identity.name.filter(|name| user.name.as_ref() != Some(name));
        if email.is_none() && name.is_none() {
            return Ok(user);
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(email) = email {
            active.email = Set(Some(email));
        }
        if let Some(name) = name {
            active.name = Set(Some(name));
        }
        active.updated_at = Set(now());

        active.update(db).await
    }

    pub async fn find_by_external_id<C: ConnectionTrait>(
        db: &C,
        external_id: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::ExternalId.eq(external_id))
            .one(db)
            .await
    }

    /// Lists users, newest first
    pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(db)
            .await
    }

    /// Changes another user's role on behalf of `acting`
    pub async fn change_role(
        db: &DatabaseConnection,
        acting: &users::Model,
        change: RoleChange,
    ) -> Result<users::Model, ServiceError> {
        change.validate()?;
        if change.user_id == acting.id {
            return Err(ServiceError::invalid("You cannot change your own role"));
        }

        let user = users::Entity::find_by_id(change.user_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        let mut active: users::ActiveModel = user.into();
        active.role = Set(change.role);
        active.updated_at = Set(now());
        let updated = active.update(db).await?;

        info!(
            "User {} changed the role of {} to {}",
            acting.id, updated.id, updated.role
        );
        Ok(updated)
    }
}
