//! Database seeder for Gestion development and testing.
//!
//! Seeds the five roles, an `admin` user, and starter clients, companies,
//! banks and accounts. Every step is skipped when its table already has rows,
//! so the seeder can run repeatedly.
//!
//! Usage: cargo run --bin seeder
//!
//! The admin password comes from `SEED_ADMIN_PASSWORD` (default `admin`).

use anyhow::Context;
use gestion_core::auth::{NewUserInput, Role};
use gestion_core::movement::AccountDirectory;
use gestion_db::{CatalogRepository, UserError, UserRepository};
use gestion_shared::AppConfig;
use gestion_shared::telemetry::init_tracing;

const CLIENTS: [&str; 2] = ["Cliente General", "Comercial Norte"];
const COMPANIES: [&str; 2] = ["Gestion Empresarial", "Servicios Integrales"];
const BANKS: [&str; 2] = ["Banco Nacional", "Banco Regional"];
const ACCOUNTS: [(&str, &str); 6] = [
    ("Caja", "ACTIVO"),
    ("Bancos", "ACTIVO"),
    ("Ventas", "INGRESO"),
    ("Servicios", "INGRESO"),
    ("Nomina", "EGRESO"),
    ("Papeleria", "GASTO"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Connecting to database...");
    let db = gestion_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    let catalogs = CatalogRepository::new(db);

    let roles = users.ensure_roles().await.context("Failed to seed roles")?;
    tracing::info!(roles = roles.len(), "Roles ready");

    seed_admin(&users).await?;
    seed_catalogs(&catalogs).await?;
    seed_accounts(&catalogs).await?;

    tracing::info!("Seeding complete");
    Ok(())
}

async fn seed_admin(users: &UserRepository) -> anyhow::Result<()> {
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let input = NewUserInput {
        username: "admin".to_string(),
        full_name: Some("Administrador".to_string()),
        password: password.clone(),
        confirmation: password,
        role: Role::Admin,
        active: true,
    };

    match users.create_user(&input).await {
        Ok(user) => tracing::info!(user_id = %user.id, "Created admin user"),
        Err(UserError::DuplicateUsername(_)) => {
            tracing::info!("Admin user already exists, skipping");
        }
        Err(e) => return Err(e).context("Failed to seed admin user"),
    }
    Ok(())
}

async fn seed_catalogs(catalogs: &CatalogRepository) -> anyhow::Result<()> {
    if catalogs.list_clients().await?.is_empty() {
        for name in CLIENTS {
            catalogs.create_client(name).await?;
        }
        tracing::info!(count = CLIENTS.len(), "Seeded clients");
    }
    if catalogs.list_companies().await?.is_empty() {
        for name in COMPANIES {
            catalogs.create_company(name).await?;
        }
        tracing::info!(count = COMPANIES.len(), "Seeded companies");
    }
    if catalogs.list_banks().await?.is_empty() {
        for name in BANKS {
            catalogs.create_bank(name).await?;
        }
        tracing::info!(count = BANKS.len(), "Seeded banks");
    }
    Ok(())
}

async fn seed_accounts(catalogs: &CatalogRepository) -> anyhow::Result<()> {
    if !catalogs.list_accounts().await?.is_empty() {
        tracing::info!("Accounts already exist, skipping");
        return Ok(());
    }
    for (name, type_tag) in ACCOUNTS {
        catalogs.create_account(name, type_tag).await?;
    }
    tracing::info!(count = ACCOUNTS.len(), "Seeded accounts");
    Ok(())
}
