use std::{env, path::Path};

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{db_types::NewTenant, SqliteDatabase, TenantManagement};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

/// A fresh database URL in the system temp directory.
pub fn random_db_path() -> String {
    let dir = env::temp_dir();
    format!("sqlite://{}/shopsync_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 1).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    db.close().await;
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        trace!("🚀️ Did not drop database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("🚀️ Created Sqlite database {p}");
}

/// A complete tenant record for `shop`, e.g. `acme` becomes `acme.myshopify.com`.
pub fn new_tenant(shop: &str) -> NewTenant {
    NewTenant {
        name: format!("{shop} store"),
        shop_domain: format!("{shop}.myshopify.com"),
        email: format!("ops@{shop}.test"),
        api_key: format!("{shop}-key"),
        api_secret: format!("{shop}-secret").into(),
        access_token: format!("shpat_{shop}").into(),
    }
}

/// Registers a tenant for `shop` and returns its id.
pub async fn create_tenant<B: TenantManagement>(db: &B, shop: &str) -> i64 {
    db.insert_tenant(new_tenant(shop)).await.expect("Error creating tenant").id
}
