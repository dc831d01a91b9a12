//! Customers: account holders of the bank.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A customer profile. The password never leaves the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub house_no: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub house_no: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub username: String,
    pub password: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.customer_id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            house_no: model.house_no,
            city: model.city,
            zipcode: model.zipcode,
            username: model.username,
            created_at: model.created_at,
        }
    }
}
