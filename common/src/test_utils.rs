use crate::database::{
    Database, DatabaseConnection, DatabaseCredentials, DatabaseSettings,
};
use crate::domain::{ColumnName, PublishingColumns};

/// Settings pointing at a local database that is never actually reached.
///
/// Public so that other crates can reuse it for their own tests.
pub fn local_database_settings() -> DatabaseSettings {
    DatabaseSettings {
        host: "localhost".to_owned(),
        db: "workflow_test".to_owned(),
        schema: "public".to_owned(),
        credentials: DatabaseCredentials {
            username: "postgres".to_owned(),
            password: "postgres".to_owned(),
        },
        connection: DatabaseConnection {
            min_connections: 0,
            max_connections: 1,
            acquire_timeout_seconds: 1,
        },
    }
}

/// Helper for building a leaked lazy `Database` value.
pub fn lazy_database() -> &'static Database {
    Box::leak(Box::new(Database::connect_lazy(&local_database_settings())))
}

/// Column configuration with the conventional names.
pub fn workflow_columns() -> PublishingColumns {
    PublishingColumns::default()
}

/// Column configuration with every workflow column prefixed, for exercising
/// renamed-column setups.
pub fn prefixed_columns(prefix: &str) -> PublishingColumns {
    PublishingColumns {
        status: column(&format!("{prefix}_status")),
        published_at: column(&format!("{prefix}_published_at")),
        published_by: column(&format!("{prefix}_published_by")),
        strict: true,
    }
}

fn column(name: &str) -> ColumnName {
    ColumnName::try_new(name).unwrap()
}
