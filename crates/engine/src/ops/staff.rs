use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, NewStaff, ResultEngine, StaffMember, StaffRole, StaffUpdate, staff,
    util::{normalize_optional, normalize_username},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an employee or a manager. Usernames are unique per role.
    pub async fn create_staff(&self, new: NewStaff) -> ResultEngine<StaffMember> {
        let username = normalize_username(&new.username)?;
        if new.password.is_empty() {
            return Err(EngineError::InvalidField(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let exists = staff::Entity::find()
                .filter(staff::Column::Role.eq(new.role.as_str()))
                .filter(staff::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let model = staff::ActiveModel {
                role: ActiveValue::Set(new.role.as_str().to_string()),
                username: ActiveValue::Set(username),
                password: ActiveValue::Set(new.password),
                full_name: ActiveValue::Set(normalize_optional(new.full_name.as_deref())),
                email: ActiveValue::Set(normalize_optional(new.email.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(staff_id = model.staff_id, role = new.role.as_str(), "staff created");
            StaffMember::try_from(model)
        })
    }

    /// Every staff member with the given role, ordered by id.
    pub async fn staff(&self, role: StaffRole) -> ResultEngine<Vec<StaffMember>> {
        staff::Entity::find()
            .filter(staff::Column::Role.eq(role.as_str()))
            .order_by_asc(staff::Column::StaffId)
            .all(&self.database)
            .await?
            .into_iter()
            .map(StaffMember::try_from)
            .collect()
    }

    pub async fn staff_member(&self, role: StaffRole, staff_id: i32) -> ResultEngine<StaffMember> {
        let model = self.find_staff(role, staff_id, &self.database).await?;
        StaffMember::try_from(model)
    }

    pub async fn update_staff(
        &self,
        role: StaffRole,
        staff_id: i32,
        update: StaffUpdate,
    ) -> ResultEngine<StaffMember> {
        let username = normalize_username(&update.username)?;
        with_tx!(self, |db_tx| {
            let current: staff::ActiveModel =
                self.find_staff(role, staff_id, &db_tx).await?.into();

            let taken = staff::Entity::find()
                .filter(staff::Column::Role.eq(role.as_str()))
                .filter(staff::Column::Username.eq(username.as_str()))
                .filter(staff::Column::StaffId.ne(staff_id))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(username));
            }

            let model = staff::ActiveModel {
                username: ActiveValue::Set(username),
                full_name: ActiveValue::Set(normalize_optional(update.full_name.as_deref())),
                email: ActiveValue::Set(normalize_optional(update.email.as_deref())),
                ..current
            }
            .update(&db_tx)
            .await?;

            StaffMember::try_from(model)
        })
    }

    pub async fn delete_staff(&self, role: StaffRole, staff_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_staff(role, staff_id, &db_tx).await?;
            staff::Entity::delete_by_id(staff_id).exec(&db_tx).await?;
            tracing::info!(staff_id, role = role.as_str(), "staff deleted");
            Ok(())
        })
    }

    /// Checks staff credentials for the given role.
    pub async fn authenticate_staff(
        &self,
        role: StaffRole,
        username: &str,
        password: &str,
    ) -> ResultEngine<StaffMember> {
        let Ok(username) = normalize_username(username) else {
            return Err(EngineError::InvalidCredentials);
        };
        let model = staff::Entity::find()
            .filter(staff::Column::Role.eq(role.as_str()))
            .filter(staff::Column::Username.eq(username))
            .one(&self.database)
            .await?;

        match model {
            Some(model) if model.password == password => StaffMember::try_from(model),
            _ => Err(EngineError::InvalidCredentials),
        }
    }

    async fn find_staff<C: ConnectionTrait>(
        &self,
        role: StaffRole,
        staff_id: i32,
        db: &C,
    ) -> ResultEngine<staff::Model> {
        staff::Entity::find_by_id(staff_id)
            .filter(staff::Column::Role.eq(role.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{} not exists", role.as_str())))
    }
}
