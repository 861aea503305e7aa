use pcq::cli::{run, Reported};
use pcq::error::AppError;

fn main() {
    let _ = enable_ansi_support::enable_ansi_support();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        // Already explained on screen
        if let Some(reported) = e.downcast_ref::<Reported>() {
            std::process::exit(reported.exit_code);
        }

        let is_user_error = e
            .downcast_ref::<AppError>()
            .map(AppError::is_validation)
            .unwrap_or(false);
        if is_user_error {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }

        eprintln!("Internal error: {}", e);
        // Show error chain if available
        let mut source = e.source();
        if source.is_some() {
            eprintln!("\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                eprintln!("{:indent$}  {}", "", err);
                source = err.source();
                indent += 1;
            }
        }
        std::process::exit(2);
    }
}
