use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod chart;
mod cli;
mod dates;
mod export;
mod ext;
mod fetch;
mod history;
mod jira;
mod jql;
mod model;
mod project;
mod roster;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: compose the query and run the paginated search
  let started = Instant::now();
  let jql = cfg
    .raw_jql
    .clone()
    .unwrap_or_else(|| cfg.criteria.compose());

  let api = jira::select_api(&cfg)?;
  let today = chrono::Local::now().date_naive();
  let outcome = fetch::run_search(&cfg, api.as_ref(), &jql, today)?;

  // Phase 3: render the requested reports
  if cfg.active_check {
    let mut authors = aggregate::Tally::default();
    for author in &outcome.totals.comment_authors {
      authors.add(author.clone());
    }
    chart::print_tally("comment activity", &authors);
  }

  if cfg.expand && cfg.verify_check && cfg.date_range.is_some() {
    chart::print_tally("verified transitions", &outcome.totals.verified);
    chart::print_tally("QA verified transitions", &outcome.totals.qa_verified);
  }

  if cfg.expand && cfg.label_check.is_some() && cfg.date_range.is_some() {
    chart::print_tally("label additions", &outcome.totals.label_adds);
  }

  if cfg.di_count {
    chart::print_tally("severity distribution", &outcome.totals.severity);
  }

  if cfg.export {
    let path = export::destination(&cfg);
    export::write_csv(&cfg, &outcome.records, &path)?;
  }

  info!("elapsed: {:.1}s", started.elapsed().as_secs_f64());
  Ok(())
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}
