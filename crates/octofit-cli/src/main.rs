// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use octofit_api::Client;
use octofit_app::AppState;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "octofit.log";

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
            "load config {}; run `octofit --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let base_url = config.base_url();
    if options.print_base_url {
        println!("{base_url}");
        return Ok(());
    }

    let _log_guard = init_logging(&config)?;
    tracing::info!(%base_url, demo = options.demo, "starting octofit");

    let client = Client::new(&base_url, config.timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; set base_url, or OCTOFIT_API_URL, to an http(s) URL",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        return check_endpoints(&client);
    }

    let mut state = AppState {
        active_tab: config.start_tab(),
        home_visible: config.show_home(),
        ..AppState::default()
    };

    if options.demo {
        let mut runtime = DemoRuntime::new(octofit_testkit::demo_dataset());
        octofit_tui::run_app(&mut state, &mut runtime)
    } else {
        let mut runtime = ApiRuntime::new(client);
        octofit_tui::run_app(&mut state, &mut runtime)
    }
}

/// Daily-rolling file logs; `RUST_LOG` overrides `[logging].level`.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level()))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow::anyhow!("install log subscriber: {error}"))?;

    Ok(guard)
}

fn check_endpoints(client: &Client) -> Result<()> {
    let mut failed = 0usize;
    for kind in octofit_app::ResourceKind::ALL {
        match client.fetch_collection(kind) {
            Ok(fetched) => {
                println!("{}: {} records", kind.as_str(), fetched.records.len());
            }
            Err(error) => {
                failed += 1;
                println!("{}: {error}", kind.as_str());
            }
        }
    }
    if failed > 0 {
        bail!(
            "{failed} of {} endpoints failed at {}",
            octofit_app::ResourceKind::ALL.len(),
            client.base_url()
        );
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_base_url: bool,
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
        print_config_path: false,
        print_base_url: false,
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
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-base-url" => {
                options.print_base_url = true;
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
    println!("octofit: terminal client for the Octofit Tracker API");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-base-url         Print resolved API base URL");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with built-in demo data (no network)");
    println!("  --check                  Fetch every collection once and report counts");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, check_endpoints, parse_cli_args};
    use anyhow::Result;
    use octofit_api::Client;
    use octofit_app::ResourceKind;
    use octofit_testkit::{MockApi, MockResponse, demo_dataset};
    use std::path::PathBuf;
    use std::time::Duration;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/octofit-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_base_url: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--print-base-url",
                "--check",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_base_url);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_flag() -> Result<()> {
        let options = parse_cli_args(vec!["--demo"], default_options_path())?;
        assert!(options.demo);
        assert!(!options.check_only);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn check_passes_when_every_endpoint_answers() -> Result<()> {
        let dataset = demo_dataset();
        let responses = ResourceKind::ALL
            .iter()
            .map(|kind| MockResponse::json(&dataset.body(*kind)))
            .collect();
        let api = MockApi::serve(responses)?;
        let client = Client::new(api.base_url(), Duration::from_secs(2))?;

        check_endpoints(&client)?;
        assert_eq!(api.finish()?.len(), ResourceKind::ALL.len());
        Ok(())
    }

    #[test]
    fn check_fails_when_any_endpoint_errors() -> Result<()> {
        let mut responses = ResourceKind::ALL
            .iter()
            .map(|_| MockResponse::json(&serde_json::json!([])))
            .collect::<Vec<_>>();
        responses[2] = MockResponse::status(500);
        let api = MockApi::serve(responses)?;
        let client = Client::new(api.base_url(), Duration::from_secs(2))?;

        let error = check_endpoints(&client).expect_err("500 should fail the check");
        assert!(error.to_string().contains("1 of 5 endpoints failed"));
        api.finish()?;
        Ok(())
    }
}
