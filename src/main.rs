//! `market-pulse <symbol> [timeframe]`
//!
//! One-shot terminal dashboard: fetch, score, ask for a verdict, print.

use dotenvy::dotenv;
use market_pulse::analysis::VerdictService;
use market_pulse::config::AppConfig;
use market_pulse::core::pipeline::MarketPipeline;
use market_pulse::display::DashboardView;
use market_pulse::logging;
use market_pulse::models::Timeframe;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: market-pulse <symbol> [timeframe]\n  timeframes: 5m, 15m, 30m, 1h, 4h";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    logging::init_cli_logging();

    let mut args = env::args().skip(1);
    let Some(symbol) = args.next().filter(|s| s != "-h" && s != "--help") else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match run(&symbol, args.next()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(symbol: &str, timeframe: Option<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let timeframe = match timeframe {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => config.pipeline.default_timeframe,
    };

    let pipeline = MarketPipeline::from_config(&config.pipeline)?;
    let verdicts = VerdictService::from_config(&config.verdict)?;

    let report = pipeline.report(symbol, timeframe).await;
    let verdict = verdicts.analyze(symbol, &report.snapshot).await;
    let view = DashboardView::build(&report, verdict);

    println!("{}", view.render_text());
    Ok(view.has_data)
}
