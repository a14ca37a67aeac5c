use anyhow::Context;
use clap::{CommandFactory, Parser, crate_version};
use tracing::info;
use wattstash::{
    api::{foxess, new_agent},
    cache::Store,
    cli::foxess::Args,
    fetcher::Fetcher,
    tables::build_fetched_table,
};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    args.common.init_tracing();

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };
    info!(version = crate_version!(), "starting…");

    let api = foxess::Api::new(args.api.config()?, new_agent())?;
    let fetcher = Fetcher::new(api, Store::new(&args.api.data_dir));
    let fetched = command
        .run(&fetcher, args.common.use_cache())
        .context("failed to fetch from FoxESS Cloud")?;

    println!("{}", build_fetched_table(&fetched));
    info!("done!");
    Ok(())
}
