use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_api::config::{AppEnv, Config};
use recipe_api::db::{AppState, create_pool, init_db, queries};
use recipe_api::handlers;
use recipe_api::identity::PasswordHasher;
use recipe_api::jwt::TokenService;
use recipe_api::models::{
    CreateIngredient, CreateRecipe, CreateReview, Difficulty, Role,
};
use recipe_api::rate_limit::RateLimitGate;

#[derive(Parser, Debug)]
#[command(name = "recipe-api")]
#[command(about = "REST API for recipes, ingredients, reviews and favorites")]
struct Cli {
    /// Seed the database with dev data (accounts, recipes, reviews)
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (development only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,

    /// Grant the admin role to an existing account and exit
    #[arg(long, value_name = "EMAIL")]
    promote_admin: Option<String>,
}

/// Grant admin to `email`. Returns false if no such account exists.
fn promote_to_admin(state: &AppState, email: &str) -> bool {
    let conn = state.db.get().expect("Failed to get db connection for promotion");
    let Some(account) =
        queries::get_account_by_email(&conn, email).expect("Failed to look up account")
    else {
        return false;
    };

    if queries::get_role(&conn, &account.id).expect("Failed to read role") == Role::Admin {
        tracing::info!("{} is already an admin", account.email);
        return true;
    }
    queries::set_role(&conn, &account.id, Role::Admin).expect("Failed to set admin role");
    tracing::info!("Granted admin role to {} ({})", account.email, account.id);
    true
}

/// Seeds the database with dev data.
/// Only runs in development mode and when the dev accounts don't exist yet.
async fn seed_dev_data(state: &AppState) {
    const ADMIN_EMAIL: &str = "admin@recipes.local";
    const COOK_EMAIL: &str = "cook@recipes.local";
    const PASSWORD: &str = "password123";

    {
        let conn = state.db.get().expect("Failed to get db connection for seeding");
        if queries::get_account_by_email(&conn, ADMIN_EMAIL)
            .expect("Failed to look up account")
            .is_some()
        {
            tracing::info!("Database already has dev data, skipping seed");
            return;
        }
    }

    tracing::info!("============================================");
    tracing::info!("SEEDING DEV DATA");
    tracing::info!("============================================");

    let password_hash = state
        .hasher
        .hash(PASSWORD.to_string())
        .await
        .expect("Failed to hash dev password");

    let mut conn = state.db.get().expect("Failed to get db connection for seeding");

    let admin = queries::create_account(&mut conn, ADMIN_EMAIL, &password_hash)
        .expect("Failed to create dev admin");
    queries::set_role(&conn, &admin.id, Role::Admin).expect("Failed to promote dev admin");
    let cook = queries::create_account(&mut conn, COOK_EMAIL, &password_hash)
        .expect("Failed to create dev cook");

    let butter_chicken = queries::create_recipe(
        &conn,
        &cook.id,
        &CreateRecipe {
            title: "Butter Chicken".into(),
            description: "Tandoori chicken simmered in a rich tomato and butter gravy".into(),
            cooking_time: 60,
            difficulty: Difficulty::Medium,
            cuisine_type: "North Indian".into(),
        },
    )
    .expect("Failed to create dev recipe");

    for (name, quantity, unit) in [
        ("Chicken thighs", "500", Some("grams")),
        ("Butter", "3", Some("tbsp")),
        ("Tomato puree", "1", Some("cup")),
        ("Garam masala", "1", Some("tsp")),
    ] {
        queries::create_ingredient(
            &conn,
            &CreateIngredient {
                recipe_id: butter_chicken.id.clone(),
                name: name.into(),
                quantity: quantity.into(),
                unit: unit.map(String::from),
            },
        )
        .expect("Failed to create dev ingredient");
    }

    let dosa = queries::create_recipe(
        &conn,
        &admin.id,
        &CreateRecipe {
            title: "Masala Dosa".into(),
            description: "Crisp fermented rice crepe filled with spiced potato".into(),
            cooking_time: 45,
            difficulty: Difficulty::Hard,
            cuisine_type: "South Indian".into(),
        },
    )
    .expect("Failed to create dev recipe");

    queries::create_review(
        &conn,
        &cook.id,
        &CreateReview {
            recipe_id: dosa.id.clone(),
            rating: 5,
            comment: "Crispy every time".into(),
        },
    )
    .expect("Failed to create dev review");
    queries::create_favorite(&conn, &cook.id, &dosa.id).expect("Failed to create dev favorite");

    tracing::info!("Admin: {} (id: {})", admin.email, admin.id);
    tracing::info!("Cook: {} (id: {})", cook.email, cook.id);
    tracing::info!("Password for both: {}", PASSWORD);
    tracing::info!("Recipes: {}, {}", butter_chicken.id, dosa.id);
    tracing::info!("============================================");
    tracing::info!("DEV DATA SEEDED SUCCESSFULLY");
    tracing::info!("============================================");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    match config.env {
        AppEnv::Development => tracing::info!("Running in DEVELOPMENT mode"),
        AppEnv::Test => tracing::info!("Running in TEST mode (rate limits need opt-in header)"),
        AppEnv::Production => {}
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState {
        db: db_pool,
        env: config.env,
        trust_proxy: config.trust_proxy,
        tokens: TokenService::new(&config.jwt_secret, config.token_ttl_hours),
        hasher: PasswordHasher::new(),
        rate_limiter: Arc::new(RateLimitGate::new(config.rate_limit)),
    };

    if let Some(ref email) = cli.promote_admin {
        if !promote_to_admin(&state, email) {
            eprintln!("No account registered with email {}", email);
            std::process::exit(1);
        }
        return;
    }

    let dev_mode = config.env == AppEnv::Development;

    if cli.seed {
        if dev_mode {
            seed_dev_data(&state).await;
        } else {
            tracing::warn!("--seed flag ignored: not in development mode (set APP_ENV=development)");
        }
    }

    if let Some(ref email) = config.bootstrap_admin_email {
        if !promote_to_admin(&state, email) {
            tracing::warn!(
                "BOOTSTRAP_ADMIN_EMAIL {} has no account yet; register it and restart",
                email
            );
        }
    }

    let app = handlers::app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    let cleanup_on_exit = cli.ephemeral && dev_mode;
    if cli.ephemeral && !dev_mode {
        tracing::warn!("--ephemeral flag ignored: not in development mode");
    }
    if cleanup_on_exit {
        tracing::info!("EPHEMERAL MODE: database will be deleted on exit");
    }

    tracing::info!("Recipe API listening on {}", addr);

    // Peer addresses feed the per-client rate limit counters
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    if cleanup_on_exit {
        let db_path = &config.database_path;
        tracing::info!("Cleaning up ephemeral database...");
        if let Err(e) = std::fs::remove_file(db_path) {
            tracing::warn!("Failed to remove {}: {}", db_path, e);
        } else {
            tracing::info!("Removed {}", db_path);
        }
        let _ = std::fs::remove_file(format!("{}-wal", db_path));
        let _ = std::fs::remove_file(format!("{}-shm", db_path));
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
