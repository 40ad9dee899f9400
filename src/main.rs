// src/main.rs

use specwatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("specwatch error: {err:?}");
        std::process::exit(1);
    }

    // The console task may still sit in a blocking stdin read; exiting the
    // process directly avoids waiting for one more input line or EOF.
    std::process::exit(0);
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
