use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Customer, CustomerUpdate, EngineError, NewCustomer, ResultEngine, accounts, customers,
    transactions,
    util::{normalize_optional, normalize_required, normalize_username},
};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a new customer. Usernames are unique after normalization.
    pub async fn create_customer(&self, new: NewCustomer) -> ResultEngine<Customer> {
        let name = normalize_required(&new.name, "name")?;
        let username = normalize_username(&new.username)?;
        if new.password.is_empty() {
            return Err(EngineError::InvalidField(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let exists = customers::Entity::find()
                .filter(customers::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let model = customers::ActiveModel {
                name: ActiveValue::Set(name),
                phone: ActiveValue::Set(normalize_optional(new.phone.as_deref())),
                email: ActiveValue::Set(normalize_optional(new.email.as_deref())),
                house_no: ActiveValue::Set(normalize_optional(new.address.house_no.as_deref())),
                city: ActiveValue::Set(normalize_optional(new.address.city.as_deref())),
                zipcode: ActiveValue::Set(normalize_optional(new.address.zipcode.as_deref())),
                username: ActiveValue::Set(username),
                password: ActiveValue::Set(new.password),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(Customer::from(model))
        })
    }

    pub async fn customers(&self) -> ResultEngine<Vec<Customer>> {
        let models = customers::Entity::find()
            .order_by_asc(customers::Column::CustomerId)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Customer::from).collect())
    }

    pub async fn customer(&self, customer_id: i32) -> ResultEngine<Customer> {
        customers::Entity::find_by_id(customer_id)
            .one(&self.database)
            .await?
            .map(Customer::from)
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))
    }

    pub async fn customer_by_username(&self, username: &str) -> ResultEngine<Customer> {
        let username = normalize_username(username)?;
        customers::Entity::find()
            .filter(customers::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .map(Customer::from)
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))
    }

    /// Replaces the profile fields of a customer.
    pub async fn update_customer(
        &self,
        customer_id: i32,
        update: CustomerUpdate,
    ) -> ResultEngine<Customer> {
        let name = normalize_required(&update.name, "name")?;
        with_tx!(self, |db_tx| {
            let model: customers::ActiveModel =
                self.require_customer(&db_tx, customer_id).await?.into();
            let model = customers::ActiveModel {
                name: ActiveValue::Set(name),
                phone: ActiveValue::Set(normalize_optional(update.phone.as_deref())),
                email: ActiveValue::Set(normalize_optional(update.email.as_deref())),
                house_no: ActiveValue::Set(normalize_optional(update.address.house_no.as_deref())),
                city: ActiveValue::Set(normalize_optional(update.address.city.as_deref())),
                zipcode: ActiveValue::Set(normalize_optional(update.address.zipcode.as_deref())),
                ..model
            }
            .update(&db_tx)
            .await?;

            Ok(Customer::from(model))
        })
    }

    /// Removes a customer with all of their accounts and transactions.
    pub async fn delete_customer(&self, customer_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;

            let account_ids: Vec<i32> = accounts::Entity::find()
                .filter(accounts::Column::CustomerId.eq(customer_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|account| account.account_id)
                .collect();

            if !account_ids.is_empty() {
                transactions::Entity::delete_many()
                    .filter(transactions::Column::AccountId.is_in(account_ids.clone()))
                    .exec(&db_tx)
                    .await?;
                accounts::Entity::delete_many()
                    .filter(accounts::Column::AccountId.is_in(account_ids))
                    .exec(&db_tx)
                    .await?;
            }
            customers::Entity::delete_by_id(customer_id)
                .exec(&db_tx)
                .await?;

            tracing::info!(customer_id, "customer deleted");
            Ok(())
        })
    }

    /// Checks customer credentials and returns the profile on success.
    pub async fn authenticate_customer(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Customer> {
        let Ok(username) = normalize_username(username) else {
            return Err(EngineError::InvalidCredentials);
        };
        let model = customers::Entity::find()
            .filter(customers::Column::Username.eq(username))
            .one(&self.database)
            .await?;

        match model {
            Some(model) if model.password == password => Ok(Customer::from(model)),
            _ => Err(EngineError::InvalidCredentials),
        }
    }
}
