use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Branch, EngineError, NewBranch, ResultEngine, branches, transactions,
    util::{normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn create_branch(&self, new: NewBranch) -> ResultEngine<Branch> {
        let name = normalize_required(&new.name, "name")?;
        let model = branches::ActiveModel {
            name: ActiveValue::Set(name),
            house_no: ActiveValue::Set(normalize_optional(new.address.house_no.as_deref())),
            city: ActiveValue::Set(normalize_optional(new.address.city.as_deref())),
            zip_code: ActiveValue::Set(normalize_optional(new.address.zipcode.as_deref())),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.database)
        .await?;

        tracing::info!(branch_id = model.branch_id, "branch created");
        Ok(Branch::from(model))
    }

    pub async fn branches(&self) -> ResultEngine<Vec<Branch>> {
        let models = branches::Entity::find()
            .order_by_asc(branches::Column::BranchId)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Branch::from).collect())
    }

    pub async fn branch(&self, branch_id: i32) -> ResultEngine<Branch> {
        branches::Entity::find_by_id(branch_id)
            .one(&self.database)
            .await?
            .map(Branch::from)
            .ok_or_else(|| EngineError::KeyNotFound("branch not exists".to_string()))
    }

    pub async fn update_branch(&self, branch_id: i32, update: NewBranch) -> ResultEngine<Branch> {
        let name = normalize_required(&update.name, "name")?;
        with_tx!(self, |db_tx| {
            let model: branches::ActiveModel =
                self.require_branch(&db_tx, branch_id).await?.into();
            let model = branches::ActiveModel {
                name: ActiveValue::Set(name),
                house_no: ActiveValue::Set(normalize_optional(update.address.house_no.as_deref())),
                city: ActiveValue::Set(normalize_optional(update.address.city.as_deref())),
                zip_code: ActiveValue::Set(normalize_optional(update.address.zipcode.as_deref())),
                ..model
            }
            .update(&db_tx)
            .await?;

            Ok(Branch::from(model))
        })
    }

    /// Deletes a branch. Branches referenced by any transaction are kept, since
    /// the ledger must stay complete.
    pub async fn delete_branch(&self, branch_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_branch(&db_tx, branch_id).await?;

            let used = transactions::Entity::find()
                .filter(transactions::Column::BranchId.eq(branch_id))
                .count(&db_tx)
                .await?;
            if used > 0 {
                return Err(EngineError::Conflict(format!(
                    "branch is referenced by {used} transactions"
                )));
            }

            branches::Entity::delete_by_id(branch_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(branch_id, "branch deleted");
            Ok(())
        })
    }
}
