//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `askboard_core` linkage, configuration and schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use askboard_core::config::CoreConfig;
use askboard_core::db::migrations::current_user_version;
use askboard_core::db::open_db;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = askboard_core::init_logging(&config.log_level, log_dir) {
            eprintln!("askboard logging error={err}");
            return ExitCode::FAILURE;
        }
    }

    println!("askboard_core ping={}", askboard_core::ping());
    println!("askboard_core version={}", askboard_core::core_version());

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            log::error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("askboard db_path={} error={err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    match current_user_version(&conn) {
        Ok(version) => {
            println!("askboard db_path={}", config.db_path.display());
            println!("askboard schema_version={version}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("askboard schema_version error={err}");
            ExitCode::FAILURE
        }
    }
}
