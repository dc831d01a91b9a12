use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{
    AccountType, Address, Engine, EngineError, MoneyCents, NewBranch, NewCustomer, NewStaff,
    OpenAccountCmd, StaffRole,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "bank_admin")]
#[command(about = "Admin utilities for the bank (bootstrap staff, branches, customers)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./bank.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Staff(StaffCommand),
    #[command(subcommand)]
    Branch(BranchCommand),
    #[command(subcommand)]
    Customer(CustomerCommand),
    #[command(subcommand)]
    Account(AccountCommand),
}

#[derive(Subcommand, Debug)]
enum StaffCommand {
    Create(StaffCreateArgs),
    List {
        #[arg(long, value_enum)]
        role: Role,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    Employee,
    Manager,
}

impl From<Role> for StaffRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Employee => StaffRole::Employee,
            Role::Manager => StaffRole::Manager,
        }
    }
}

#[derive(Args, Debug)]
struct StaffCreateArgs {
    #[arg(long, value_enum)]
    role: Role,
    #[arg(long)]
    username: String,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Args, Debug)]
struct AddressArgs {
    #[arg(long)]
    house_no: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    zipcode: Option<String>,
}

impl From<AddressArgs> for Address {
    fn from(args: AddressArgs) -> Self {
        Address {
            house_no: args.house_no,
            city: args.city,
            zipcode: args.zipcode,
        }
    }
}

#[derive(Subcommand, Debug)]
enum BranchCommand {
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        address: AddressArgs,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        address: AddressArgs,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Open {
        #[arg(long)]
        customer_id: i32,
        /// Opening balance, e.g. `100.00`.
        #[arg(long, default_value = "0")]
        opening_balance: MoneyCents,
        #[arg(long, default_value = "SAVINGS", value_parser = parse_account_type)]
        account_type: AccountType,
    },
    /// Compare an account balance with the sum of its transactions.
    Reconcile {
        #[arg(long)]
        account_id: i32,
    },
}

fn parse_account_type(raw: &str) -> Result<AccountType, String> {
    AccountType::try_from(raw.to_uppercase().as_str()).map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        if first == prompt_password("Confirm password: ")? {
            return Ok(first);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Prints a readable error for rejected input and exits, like a usage error.
fn exit_on_rejection<T>(result: Result<T, EngineError>) -> Result<T, Box<dyn Error + Send + Sync>> {
    match result {
        Ok(value) => Ok(value),
        Err(EngineError::Database(err)) => Err(err.into()),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Staff(StaffCommand::Create(args)) => {
            let password = prompt_password_twice()?;
            let member = exit_on_rejection(
                engine
                    .create_staff(NewStaff {
                        role: args.role.into(),
                        username: args.username,
                        password,
                        full_name: args.full_name,
                        email: args.email,
                    })
                    .await,
            )?;
            println!(
                "created {}: {} (id {})",
                member.role.as_str(),
                member.username,
                member.id
            );
        }
        Command::Staff(StaffCommand::List { role }) => {
            for member in engine.staff(role.into()).await? {
                println!(
                    "{}\t{}\t{}",
                    member.id,
                    member.username,
                    member.full_name.unwrap_or_default()
                );
            }
        }
        Command::Branch(BranchCommand::Create { name, address }) => {
            let branch = exit_on_rejection(
                engine
                    .create_branch(NewBranch {
                        name,
                        address: address.into(),
                    })
                    .await,
            )?;
            println!("created branch: {} (id {})", branch.name, branch.id);
        }
        Command::Branch(BranchCommand::List) => {
            for branch in engine.branches().await? {
                println!(
                    "{}\t{}\t{}",
                    branch.id,
                    branch.name,
                    branch.city.unwrap_or_default()
                );
            }
        }
        Command::Customer(CustomerCommand::Create {
            name,
            username,
            phone,
            email,
            address,
        }) => {
            let password = prompt_password_twice()?;
            let customer = exit_on_rejection(
                engine
                    .create_customer(NewCustomer {
                        name,
                        phone,
                        email,
                        address: address.into(),
                        username,
                        password,
                    })
                    .await,
            )?;
            println!(
                "created customer: {} (id {})",
                customer.username, customer.id
            );
        }
        Command::Account(AccountCommand::Open {
            customer_id,
            opening_balance,
            account_type,
        }) => {
            let account = exit_on_rejection(
                engine
                    .open_account(
                        OpenAccountCmd::new(customer_id, opening_balance)
                            .account_type(account_type),
                    )
                    .await,
            )?;
            println!(
                "opened {} account {} with balance {}",
                account.account_type.as_str(),
                account.id,
                account.current_balance
            );
        }
        Command::Account(AccountCommand::Reconcile { account_id }) => {
            let report = exit_on_rejection(engine.reconcile_account(account_id).await)?;
            println!(
                "account {}: balance {}, opening {}, ledger {} over {} transactions",
                report.account_id,
                report.current_balance,
                report.opening_balance,
                report.ledger_sum,
                report.transactions
            );
            if !report.consistent {
                eprintln!("balance does not match the ledger");
                std::process::exit(3);
            }
            println!("consistent");
        }
    }

    Ok(())
}
