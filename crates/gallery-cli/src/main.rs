// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use gallery_app::TableState;
use runtime::{CatalogRuntime, DemoRuntime};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        tracing::error!(error = %format!("{error:#}"), "gallery exited with an error");
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `gallery --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let log_path = config.log_path()?;
    logging::init(options.debug, config.log_level(), &log_path).with_context(|| {
        format!(
            "set up logging at {} -- set [logging].file to a writable path",
            log_path.display()
        )
    })?;

    let mut state = TableState::with_page_size(config.page_size());

    if options.demo {
        tracing::info!(page_size = config.page_size(), "starting with demo catalog");
        if options.check_only {
            return Ok(());
        }
        return gallery_tui::run_app(&mut state, &mut DemoRuntime::new());
    }

    let client = gallery_catalog::Client::new(config.catalog_base_url(), config.catalog_timeout()?)
        .with_context(|| {
            format!(
                "invalid [catalog] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
    tracing::info!(
        base_url = client.base_url(),
        timeout_ms = client.timeout().as_millis() as u64,
        page_size = config.page_size(),
        "starting with remote catalog"
    );
    if options.check_only {
        return Ok(());
    }

    gallery_tui::run_app(&mut state, &mut CatalogRuntime::new(client))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    debug: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        debug: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--debug" => {
                options.debug = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("gallery: browse and select artworks from the Art Institute of Chicago catalog");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Browse a generated offline catalog");
    println!("  --check                  Validate config + logging + catalog client, then exit");
    println!("  --debug                  Log at debug level (RUST_LOG still wins)");
    println!("  --help                   Show this help");
}
