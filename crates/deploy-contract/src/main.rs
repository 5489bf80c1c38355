#[tokio::main]
async fn main() -> std::process::ExitCode {
    deploy_contract::start(std::env::args()).await
}
