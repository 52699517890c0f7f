use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = notion_ledger_import::args::parse();
    notion_ledger_import::cli::main(args).await
}
