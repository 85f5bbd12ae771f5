use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;

use lectern::cli::create_root;

#[derive(Parser)]
#[command(name = "lectern-cli")]
#[command(about = "Lectern CLI - administrative tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a root account
    CreateRoot {
        /// Full name of the root account
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateRoot {
            full_name,
            email,
            password,
        } => {
            let full_name = match full_name {
                Some(v) => v,
                None => Input::new().with_prompt("Full name").interact_text()?,
            };
            let email = match email {
                Some(v) => v,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = match password {
                Some(v) => v,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "passwords do not match")
                    .interact()?,
            };

            let database_url = std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect(&database_url)
                .await?;

            create_root(&pool, &full_name, &email, &password).await?;
            println!("root account created: {}", email);
        }
    }

    Ok(())
}
