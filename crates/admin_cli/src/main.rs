use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, Wallet};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "wallet_admin")]
#[command(about = "Admin utilities for the wallet service (inspect and fix wallets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./wallets.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Wallet(WalletArgs),
}

#[derive(Args, Debug)]
struct WalletArgs {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    /// List every wallet, ordered by e-mail.
    List,
    Show(Target),
    /// Set the balance to zero.
    Reset(Target),
    SetBalance(SetBalanceArgs),
    Enable(Target),
    Disable(Target),
}

#[derive(Args, Debug)]
struct Target {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct SetBalanceArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    balance: f64,
}

fn print_wallet(wallet: &Wallet) {
    println!(
        "{:<40} {:>12.2} {}",
        wallet.account_key,
        wallet.balance,
        if wallet.enabled { "enabled" } else { "disabled" }
    );
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    let Command::Wallet(WalletArgs { command }) = cli.command;
    let wallet = match command {
        WalletCommand::List => {
            let wallets = engine.wallets().await?;
            if wallets.is_empty() {
                println!("no wallets");
            }
            for wallet in &wallets {
                print_wallet(wallet);
            }
            return Ok(());
        }
        WalletCommand::Show(Target { email }) => engine.find_wallet(&email).await?,
        WalletCommand::Reset(Target { email }) => Some(engine.reset(&email).await?),
        WalletCommand::SetBalance(args) => {
            Some(engine.set_balance(&args.email, args.balance).await?)
        }
        WalletCommand::Enable(Target { email }) => Some(engine.set_enabled(&email, true).await?),
        WalletCommand::Disable(Target { email }) => {
            Some(engine.set_enabled(&email, false).await?)
        }
    };

    match wallet {
        Some(wallet) => print_wallet(&wallet),
        None => {
            eprintln!("wallet not found");
            std::process::exit(1);
        }
    }

    Ok(())
}
