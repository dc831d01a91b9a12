use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A bank branch. Every transaction records the branch it was made at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub id: i32,
    pub name: String,
    pub house_no: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub branch_id: i32,
    pub name: String,
    pub house_no: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Branch {
    fn from(model: Model) -> Self {
        Self {
            id: model.branch_id,
            name: model.name,
            house_no: model.house_no,
            city: model.city,
            zip_code: model.zip_code,
            created_at: model.created_at,
        }
    }
}
