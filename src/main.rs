#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deposit_dashboard::cli::run_with_sys_args().await
}
