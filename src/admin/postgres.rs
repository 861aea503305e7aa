use crate::admin::AdminDatabase;
use crate::config::DbConfig;
use crate::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// Single PostgreSQL connection for maintenance runs
pub struct PgAdmin {
    conn: PgConnection,
}

impl PgAdmin {
    pub fn connect_options(config: &DbConfig) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
    }

    pub async fn connect(config: &DbConfig) -> Result<Self, AppError> {
        let conn = PgConnection::connect_with(&Self::connect_options(config))
            .await
            .map_err(|e| {
                AppError::Connection(format!(
                    "{}@{}:{}/{}: {}",
                    config.user, config.host, config.port, config.database, e
                ))
            })?;
        Ok(Self { conn })
    }
}

impl AdminDatabase for PgAdmin {
    async fn verify(&mut self) -> Result<(), AppError> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::Connection(e.to_string()))
    }

    async fn execute(&mut self, sql: &str) -> Result<(), AppError> {
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map(|_| ())
            .map_err(|e| AppError::Query(e.to_string()))
    }

    async fn close(self) -> Result<(), AppError> {
        self.conn
            .close()
            .await
            .map_err(|e| AppError::Connection(format!("failed to close connection: {}", e)))
    }
}
