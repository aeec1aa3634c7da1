use anyhow::{Context, Result};
use batch_scraper::orchestrator::inspect_results;
use batch_scraper::utils::logging;
use batch_scraper::{App, Cli, Config};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(&config.log_level);

    // 只查看之前的结果
    if let Some(results_file) = &cli.inspect {
        inspect_results(results_file).context("读取结果文件失败")?;
        return Ok(());
    }

    // 初始化并运行应用
    let request = cli.to_request(config.worker_concurrency);
    App::new(config).run(request).await?;

    Ok(())
}
