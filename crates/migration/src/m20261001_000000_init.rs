//! Initial schema migration.
//!
//! It creates the complete schema for the bank:
//!
//! - `customers`: account holders, with login credentials
//! - `branches`: physical branches where transactions are recorded
//! - `staff`: employees and managers
//! - `accounts`: customer accounts with a denormalized `current_balance`
//! - `transactions`: append-only ledger of deposits and withdrawals

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Customers {
    Table,
    CustomerId,
    Name,
    Phone,
    Email,
    HouseNo,
    City,
    Zipcode,
    Username,
    Password,
    CreatedAt,
}

#[derive(Iden)]
enum Branches {
    Table,
    BranchId,
    Name,
    HouseNo,
    City,
    ZipCode,
    CreatedAt,
}

#[derive(Iden)]
enum Staff {
    Table,
    StaffId,
    Role,
    Username,
    Password,
    FullName,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    AccountId,
    CustomerId,
    DateOpened,
    CurrentBalance,
    OpeningBalance,
    AccountType,
    Status,
}

#[derive(Iden)]
enum Transactions {
    Table,
    TransactionId,
    AccountId,
    BranchId,
    Amount,
    Action,
    TransactionDate,
    ProcessedBy,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Customers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::CustomerId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string())
                    .col(ColumnDef::new(Customers::Email).string())
                    .col(ColumnDef::new(Customers::HouseNo).string())
                    .col(ColumnDef::new(Customers::City).string())
                    .col(ColumnDef::new(Customers::Zipcode).string())
                    .col(
                        ColumnDef::new(Customers::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::Password).string().not_null())
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Branches
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::BranchId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Branches::Name).string().not_null())
                    .col(ColumnDef::new(Branches::HouseNo).string())
                    .col(ColumnDef::new(Branches::City).string())
                    .col(ColumnDef::new(Branches::ZipCode).string())
                    .col(ColumnDef::new(Branches::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Staff (employees and managers)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::StaffId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staff::Role).string().not_null())
                    .col(ColumnDef::new(Staff::Username).string().not_null())
                    .col(ColumnDef::new(Staff::Password).string().not_null())
                    .col(ColumnDef::new(Staff::FullName).string())
                    .col(ColumnDef::new(Staff::Email).string())
                    .col(ColumnDef::new(Staff::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-staff-role-username")
                    .table(Staff::Table)
                    .col(Staff::Role)
                    .col(Staff::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::AccountId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Accounts::DateOpened).timestamp().not_null())
                    .col(
                        ColumnDef::new(Accounts::CurrentBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::OpeningBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::AccountType)
                            .string()
                            .not_null()
                            .default("SAVINGS"),
                    )
                    .col(
                        ColumnDef::new(Accounts::Status)
                            .string()
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-customer_id")
                            .from(Accounts::Table, Accounts::CustomerId)
                            .to(Customers::Table, Customers::CustomerId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-customer_id")
                    .table(Accounts::Table)
                    .col(Accounts::CustomerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::AccountId).integer().not_null())
                    .col(ColumnDef::new(Transactions::BranchId).integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Transactions::Amount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Transactions::Action)
                            .string()
                            .not_null()
                            .check(Expr::col(Transactions::Action).is_in(["Deposit", "Withdraw"])),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ProcessedBy).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::AccountId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-branch_id")
                            .from(Transactions::Table, Transactions::BranchId)
                            .to(Branches::Table, Branches::BranchId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-branch_id")
                    .table(Transactions::Table)
                    .col(Transactions::BranchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
