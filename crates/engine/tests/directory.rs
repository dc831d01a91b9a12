use sea_orm::Database;

use engine::{
    AccountType, Address, ApplyCmd, CustomerUpdate, Engine, EngineError, MoneyCents, NewBranch,
    NewCustomer, NewStaff, OpenAccountCmd, StaffRole, StaffUpdate,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn customer(username: &str) -> NewCustomer {
    NewCustomer {
        name: "John Doe".to_string(),
        phone: None,
        email: Some("john@example.com".to_string()),
        address: Address {
            house_no: Some("12B".to_string()),
            city: Some("Springfield".to_string()),
            zipcode: Some("49007".to_string()),
        },
        username: username.to_string(),
        password: "hunter2".to_string(),
    }
}

fn branch(name: &str) -> NewBranch {
    NewBranch {
        name: name.to_string(),
        address: Address::default(),
    }
}

#[tokio::test]
async fn customer_lifecycle() {
    let engine = engine_with_db().await;

    let created = engine.create_customer(customer(" JohnDoe ")).await.unwrap();
    assert_eq!(created.username, "johndoe");
    assert_eq!(created.city.as_deref(), Some("Springfield"));

    let by_name = engine.customer_by_username("JOHNDOE").await.unwrap();
    assert_eq!(by_name.id, created.id);

    let err = engine.create_customer(customer("johndoe")).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("johndoe".to_string()));

    let updated = engine
        .update_customer(
            created.id,
            CustomerUpdate {
                name: "John Q. Doe".to_string(),
                phone: Some("555-0199".to_string()),
                email: None,
                address: Address::default(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "John Q. Doe");
    assert_eq!(updated.email, None);
    assert_eq!(updated.username, "johndoe");

    assert_eq!(engine.customers().await.unwrap().len(), 1);

    engine.delete_customer(created.id).await.unwrap();
    let err = engine.customer(created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn customer_requires_name_and_username() {
    let engine = engine_with_db().await;

    let mut blank_name = customer("jane");
    blank_name.name = "  ".to_string();
    let err = engine.create_customer(blank_name).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidField(_)));

    let err = engine.create_customer(customer("jane doe")).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidField(_)));
}

#[tokio::test]
async fn customer_login_checks_password() {
    let engine = engine_with_db().await;
    engine.create_customer(customer("johndoe")).await.unwrap();

    let profile = engine
        .authenticate_customer("JohnDoe", "hunter2")
        .await
        .unwrap();
    assert_eq!(profile.username, "johndoe");

    let err = engine
        .authenticate_customer("johndoe", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidCredentials);
    let err = engine.authenticate_customer("", "hunter2").await.unwrap_err();
    assert_eq!(err, EngineError::InvalidCredentials);
}

#[tokio::test]
async fn accounts_open_list_and_close() {
    let engine = engine_with_db().await;
    let owner = engine.create_customer(customer("owner")).await.unwrap();
    let branch_id = engine.create_branch(branch("Main")).await.unwrap().id;

    let savings = engine
        .open_account(OpenAccountCmd::new(owner.id, "100.00".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(savings.account_type, AccountType::Savings);
    assert_eq!(savings.status, "ACTIVE");
    assert_eq!(savings.opening_balance, savings.current_balance);

    let current = engine
        .open_account(
            OpenAccountCmd::new(owner.id, MoneyCents::ZERO).account_type(AccountType::Current),
        )
        .await
        .unwrap();

    let listed = engine.list_accounts_for_customer(owner.id).await.unwrap();
    assert_eq!(
        listed.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![savings.id, current.id]
    );
    assert!(engine.list_accounts_for_customer(owner.id + 1).await.unwrap().is_empty());
    assert_eq!(engine.list_accounts().await.unwrap().len(), 2);

    engine
        .apply(ApplyCmd::deposit(savings.id, branch_id, MoneyCents::new(500)))
        .await
        .unwrap();
    engine.close_account(savings.id).await.unwrap();

    assert!(engine.list_transactions_for_customer(owner.id).await.unwrap().is_empty());
    let err = engine.close_account(savings.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn open_account_validates_input() {
    let engine = engine_with_db().await;

    let err = engine
        .open_account(OpenAccountCmd::new(42, MoneyCents::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("customer not exists".to_string()));

    let owner = engine.create_customer(customer("owner")).await.unwrap();
    let err = engine
        .open_account(OpenAccountCmd::new(owner.id, MoneyCents::new(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn deleting_customer_removes_accounts_and_history() {
    let engine = engine_with_db().await;
    let owner = engine.create_customer(customer("owner")).await.unwrap();
    let branch_id = engine.create_branch(branch("Main")).await.unwrap().id;
    let account = engine
        .open_account(OpenAccountCmd::new(owner.id, MoneyCents::ZERO))
        .await
        .unwrap();
    engine
        .apply(ApplyCmd::deposit(account.id, branch_id, MoneyCents::new(100)))
        .await
        .unwrap();

    engine.delete_customer(owner.id).await.unwrap();

    assert!(engine.list_accounts().await.unwrap().is_empty());
    assert!(matches!(
        engine.account(account.id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    // The branch is no longer referenced and can go.
    engine.delete_branch(branch_id).await.unwrap();
}

#[tokio::test]
async fn branch_in_use_cannot_be_deleted() {
    let engine = engine_with_db().await;
    let owner = engine.create_customer(customer("owner")).await.unwrap();
    let used = engine.create_branch(branch("Main")).await.unwrap();
    let unused = engine.create_branch(branch("Uptown")).await.unwrap();
    let account = engine
        .open_account(OpenAccountCmd::new(owner.id, MoneyCents::ZERO))
        .await
        .unwrap();
    engine
        .apply(ApplyCmd::deposit(account.id, used.id, MoneyCents::new(100)))
        .await
        .unwrap();

    let err = engine.delete_branch(used.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let renamed = engine
        .update_branch(
            unused.id,
            NewBranch {
                name: "Uptown West".to_string(),
                address: Address {
                    zipcode: Some("10001".to_string()),
                    ..Address::default()
                },
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Uptown West");
    assert_eq!(renamed.zip_code.as_deref(), Some("10001"));

    engine.delete_branch(unused.id).await.unwrap();
    let names: Vec<_> = engine
        .branches()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Main".to_string()]);
}

#[tokio::test]
async fn staff_roles_are_separate() {
    let engine = engine_with_db().await;
    let new = |role| NewStaff {
        role,
        username: "alex".to_string(),
        password: "pw".to_string(),
        full_name: Some("Alex Smith".to_string()),
        email: None,
    };

    let employee = engine.create_staff(new(StaffRole::Employee)).await.unwrap();
    let manager = engine.create_staff(new(StaffRole::Manager)).await.unwrap();
    assert_ne!(employee.id, manager.id);

    let err = engine.create_staff(new(StaffRole::Employee)).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alex".to_string()));

    assert_eq!(engine.staff(StaffRole::Employee).await.unwrap().len(), 1);
    let err = engine
        .staff_member(StaffRole::Manager, employee.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let logged = engine
        .authenticate_staff(StaffRole::Manager, "Alex", "pw")
        .await
        .unwrap();
    assert_eq!(logged.id, manager.id);
    let err = engine
        .authenticate_staff(StaffRole::Employee, "alex", "nope")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidCredentials);

    let updated = engine
        .update_staff(
            StaffRole::Employee,
            employee.id,
            StaffUpdate {
                username: "alex.s".to_string(),
                full_name: None,
                email: Some("alex@bank.test".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "alex.s");
    assert_eq!(updated.full_name, None);

    engine.delete_staff(StaffRole::Employee, employee.id).await.unwrap();
    assert!(engine.staff(StaffRole::Employee).await.unwrap().is_empty());
    assert_eq!(engine.staff(StaffRole::Manager).await.unwrap().len(), 1);
}
