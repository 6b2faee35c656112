use cksums_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; a read-only state dir must not stop a checksum run.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli::run_from_args().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("cksums error: {:#}", err);
            std::process::exit(1);
        }
    }
}
