//! reconchat — Shodan host lookup with an AI analyst in your terminal

#[tokio::main]
async fn main() {
    if let Err(e) = reconchat::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    match reconchat::run(std::env::args()).await {
        Ok(()) => {}
        Err(e) => {
            reconchat::log_error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
