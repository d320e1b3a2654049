use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use niche_matcher::cli::render::{render_brand_report, render_report};
use niche_matcher::cli::{Cli, Command};
use niche_matcher::config::AppConfig;
use niche_matcher::error::{ConfigError, NicheError};
use niche_matcher::orchestrator::{
    RunContext, download_artifact, load_brand_report, load_result, process_upload,
};
use niche_matcher::util::envfile::{load_dotenv_if_present, write_env_template};

#[tokio::main]
async fn main() {
    // .env must be loaded before the logger reads RUST_LOG and clap reads env-backed flags
    let dotenv = load_dotenv_if_present();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = dotenv {
        error!("could not load .env: {:#}", e);
    }
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    if let Some(ne) = e.downcast_ref::<NicheError>() {
        return ne.exit_code();
    }
    if e.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    1
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::EnvTemplate { path } = &cli.command {
        write_env_template(path)
            .with_context(|| format!("writing env template to {}", path.display()))?;
        info!("Wrote {}", path.display());
        return Ok(());
    }

    let base = AppConfig::from_env_map(&Default::default())?;
    let cfg = cli.to_app_config(base)?;
    let ctx = RunContext::from_config(&cfg);
    info!("Upload folder: {}", ctx.upload_dir.display());

    match &cli.command {
        Command::Process(args) => {
            cfg.reference.location()?;
            let report = process_upload(&ctx, &args.file)
                .await
                .with_context(|| format!("processing {}", args.file.display()))?;
            print!("{}", render_report(&report, args.output.json)?);
        }
        Command::Result(out) => {
            let report = load_result(&ctx)?;
            print!("{}", render_report(&report, out.json)?);
        }
        Command::Stats(args) => {
            let report = load_brand_report(&ctx, args.top)?;
            print!("{}", render_brand_report(&report, args.output.json)?);
        }
        Command::Download { dest } => {
            let target = download_artifact(&ctx, dest)?;
            println!("{}", target.display());
        }
        Command::EnvTemplate { .. } => {}
    }
    Ok(())
}
