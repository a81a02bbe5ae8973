use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use engine::{AssetStore, BlobStore, Engine, NewUser};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "myfin_admin")]
#[command(about = "Admin utilities for myfin (bootstrap users and seed data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./myfin.db?mode=rwc")]
    database_url: String,

    /// Directory holding the bundled seed assets (category icons).
    #[arg(long, default_value = "./assets")]
    assets_dir: PathBuf,

    /// Directory user blobs (receipts, seeded icons) are written to.
    #[arg(long, default_value = "./media")]
    media_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Categories(Categories),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    /// Skip seeding the default categories for the new user.
    #[arg(long)]
    no_default_categories: bool,
}

#[derive(Args, Debug)]
struct Categories {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// Create the default category list for an existing user.
    Seed(CategoriesSeedArgs),
}

#[derive(Args, Debug)]
struct CategoriesSeedArgs {
    #[arg(long)]
    username: String,
}

/// Seed assets read straight from a local directory.
struct DirAssets {
    root: PathBuf,
}

impl AssetStore for DirAssets {
    fn load(&self, reference: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(reference))
    }
}

/// Blob storage backed by a local directory tree.
struct DirBlobs {
    root: PathBuf,
}

impl BlobStore for DirBlobs {
    fn put(&self, reference: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.root.join(reference);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = rpassword::prompt_password("Password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }

        let second = rpassword::prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }

        eprintln!("Passwords do not match. Try again.");
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn seed_categories(
    engine: &Engine,
    user_id: i32,
    assets_dir: &Path,
    media_dir: &Path,
) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let assets = DirAssets {
        root: assets_dir.to_path_buf(),
    };
    let blobs = DirBlobs {
        root: media_dir.to_path_buf(),
    };
    let seeded = engine
        .setup_default_categories(user_id, &assets, &blobs)
        .await?;
    Ok(seeded.len())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myfin_admin=info,engine=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    tracing::info!("database ready at {}", cli.database_url);
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;
            let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;

            let user = engine
                .setup_new_user(NewUser::new(&args.username, password_hash, &args.email))
                .await?;
            println!("created user: {} (id {})", user.username, user.id);

            if !args.no_default_categories {
                let count =
                    seed_categories(&engine, user.id, &cli.assets_dir, &cli.media_dir).await?;
                println!("seeded {count} default categories");
            }
        }
        Command::Categories(Categories {
            command: CategoriesCommand::Seed(args),
        }) => {
            let user = engine.user_by_username(&args.username).await?;
            let count = seed_categories(&engine, user.id, &cli.assets_dir, &cli.media_dir).await?;
            println!("seeded {count} default categories for {}", user.username);
        }
    }

    Ok(())
}
