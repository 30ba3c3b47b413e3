use crate::args::*;
use crate::backend::Pamac;
use crate::build::{BuildContext, Limits};
use aur_build_common::config::ConfigFile;
use aur_build_common::db::Database;
use aur_build_common::errors::*;
use aur_build_common::{http, utils};
use clap::Parser;
use env_logger::Env;
use std::process;

pub mod args;
pub mod backend;
pub mod build;
pub mod decompress;
pub mod fancy;
pub mod fetch;
pub mod pager;
pub mod proc;
pub mod stats;
pub mod sync;

fn check_if_root() -> Result<()> {
    if !nix::unistd::geteuid().is_root() {
        bail!("You need to have root privileges to run this program");
    }
    Ok(())
}

fn update_db(db: &Database, config: &ConfigFile) -> Result<()> {
    let mut table = db.load()?;
    let client = http::client()?;
    let fetched = fetch::fetch_remote_list(&client, config.source.url())?;

    let summary = sync::reconcile(&mut table, &fetched);
    info!(
        "Added {} new packages, marked {} packages as deleted",
        summary.added, summary.deleted
    );
    db.write(&table)?;
    Ok(())
}

fn build_all(db: &Database, config: &ConfigFile, args: &Args) -> Result<()> {
    info!("Start building packages at {} ...", utils::now_iso());
    let mut table = db.load()?;

    let user = backend::current_user()?;
    let pamac = Pamac::new(&config.builder, &user);
    let ctx = BuildContext {
        db,
        pm: &pamac,
        pkg_cache: config.builder.pkg_cache().to_path_buf(),
        artifact_suffix: config.builder.artifact_suffix().to_string(),
    };

    let limits = Limits {
        skip: args.skip_packages,
        max: args.max_packages,
    };
    let summary = build::run_builds(&ctx, &mut table, &args.allowed_status(), limits)?;
    info!(
        "Processed {} of {} packages: {} build, {} don't build, {} are official now",
        summary.skipped + summary.processed,
        summary.total,
        summary.builds,
        summary.doesnt_build,
        summary.official
    );
    Ok(())
}

fn main() -> Result<()> {
    let mut args = Args::parse();
    args.normalize();

    let logging = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::init_from_env(Env::default().default_filter_or(logging));

    if args.color {
        debug!("Bypass tty detection and always use colors");
        colored::control::set_override(true);
    }

    if let Some(SubCommand::Completions(completions)) = &args.subcommand {
        return args::gen_completions(completions);
    }

    if !args.has_action() {
        eprintln!("Missing arguments.");
        args::print_help()?;
        process::exit(2);
    }

    check_if_root()?;

    let config = aur_build_common::config::load(args.config.as_ref())
        .context("Failed to load config file")?;
    let db = Database::new(config.db.path());

    if args.init_db {
        info!("Cleaning database...");
        db.init()?;
        info!("Done.");
    }

    if args.download {
        info!("Updating package database...");
        update_db(&db, &config).context("Failed to update package database")?;
        info!("Done.");
    }

    if !args.allowed_status().is_empty() {
        build_all(&db, &config, &args)?;
        info!("Done.");
    }

    if args.show_log {
        let buf = db.read_raw()?;
        pager::show(&buf)?;
    }

    if args.stats {
        let table = db.load()?;
        println!("{}", stats::summarize(&table));
    }

    Ok(())
}
