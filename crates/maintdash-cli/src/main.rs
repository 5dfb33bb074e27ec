// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use maintdash_api::Client;
use maintdash_app::{AppState, local_today};
use maintdash_tui::DashboardOptions;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::path::PathBuf;
use tracing::info;

const DEMO_SEED: u64 = 20_260_317;

fn main() {
    if let Err(error) = run() {
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
            "load config {}; run `maintdash --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let base_url = options
        .base_url
        .as_deref()
        .map(|url| url.trim_end_matches('/').to_owned())
        .unwrap_or_else(|| config.base_url());
    let timeout = config.timeout()?;
    let client = Client::new(&base_url, timeout).with_context(|| {
        format!(
            "invalid [server] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        if !options.demo {
            client
                .ping()
                .with_context(|| format!("backend check against {} failed", client.base_url()))?;
        }
        println!("ok: config {}", options.config_path.display());
        return Ok(());
    }

    let log_file = config.log_file()?;
    let _log_guard = logging::init(config.log_level(), &log_file)?;

    let today = local_today();
    let dashboard_options = DashboardOptions {
        page_size: config.page_size(),
        scroll_cooldown: config.scroll_cooldown()?,
        today,
    };
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %base_url,
        demo = options.demo,
        "maintdash starting"
    );

    let mut state = AppState::default();
    if options.demo {
        let mut runtime = DemoRuntime::new(DEMO_SEED, today);
        maintdash_tui::run_app(&mut state, &mut runtime, dashboard_options)
    } else {
        let mut runtime = ApiRuntime::new(client);
        maintdash_tui::run_app(&mut state, &mut runtime, dashboard_options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    base_url: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        base_url: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
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
            "--base-url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--base-url requires a URL"))?;
                options.base_url = Some(value.as_ref().to_owned());
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
    println!("maintdash - maintenance dashboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --base-url <url>         Override [server].base_url");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded demo data (no backend)");
    println!("  --check                  Validate config and ping the backend");
    println!("  --help                   Show this help");
}
