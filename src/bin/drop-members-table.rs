// Drops the backend's `members` table so the server recreates it with the
// current schema on its next start. Configured through DB_HOST, DB_PORT,
// DB_USER, DB_PASSWORD and DB_NAME, read from the environment or a `.env`
// file in the working directory.

use pcq::admin::{run_drop_table, TableName};
use pcq::config::DbConfig;
use pcq::error::AppError;

const MEMBERS_TABLE: &str = "members";

async fn drop_members() -> Result<(), AppError> {
    let config = DbConfig::from_env()?;
    let table = TableName::parse(MEMBERS_TABLE)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_drop_table(&config, &table, &mut out).await
}

fn main() {
    dotenvy::dotenv().ok();
    let _ = enable_ansi_support::enable_ansi_support();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Internal error: failed to start async runtime: {}", e);
            std::process::exit(2);
        }
    };

    match runtime.block_on(drop_members()) {
        Ok(()) => {
            println!("You can now restart the backend server.");
            println!("The members table will be recreated with the current schema.");
        }
        Err(e) => {
            log::error!("dropping members table failed: {}", e);
            eprintln!("Error dropping members table: {}", e);
            std::process::exit(if e.is_validation() { 1 } else { 2 });
        }
    }
}
