use clap::Parser;
use flicker_service::cli::commands::config::ConfigCommands;
use flicker_service::cli::{Cli, Commands};
use flicker_service::domain::models::{Config, ScenarioType};
use std::path::PathBuf;

#[test]
fn test_parse_scenarios() {
    let cli = Cli::try_parse_from(["flicker-service", "scenarios", "trace.json"]).unwrap();
    assert!(!cli.json);
    match cli.command {
        Commands::Scenarios(args) => {
            assert_eq!(args.dump, PathBuf::from("trace.json"));
            assert!(args.scenarios.is_empty());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_check_with_filters() {
    let cli = Cli::try_parse_from([
        "flicker-service",
        "--json",
        "check",
        "trace.json",
        "--scenario",
        "launcher_quick_switch",
        "-s",
        "COMMON",
        "--fail-on-blocking",
        "--results",
        "out.jsonl",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(
                args.scenarios,
                vec![ScenarioType::LauncherQuickSwitch, ScenarioType::Common]
            );
            assert!(args.fail_on_blocking);
            assert_eq!(args.results, Some(PathBuf::from("out.jsonl")));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_check_exit_policy_flags_override_config() {
    let mut config = Config::default();
    config.evaluation.fail_on_blocking = false;

    let parse = |extra: &[&str]| {
        let mut argv = vec!["flicker-service", "check", "trace.json"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Check(args) => args,
            _ => panic!("Wrong top-level command"),
        }
    };

    assert!(!parse(&[]).fails_on_blocking(&config));
    assert!(parse(&["--fail-on-blocking"]).fails_on_blocking(&config));
    assert!(!parse(&["--no-fail-on-blocking"]).fails_on_blocking(&Config::default()));
    assert!(parse(&[]).fails_on_blocking(&Config::default()));
}

#[test]
fn test_conflicting_exit_flags_rejected() {
    let result = Cli::try_parse_from([
        "flicker-service",
        "check",
        "trace.json",
        "--fail-on-blocking",
        "--no-fail-on-blocking",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_scenario_rejected() {
    let result = Cli::try_parse_from(["flicker-service", "scenarios", "t.json", "--scenario", "BOGUS"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_config_commands() {
    let cli = Cli::try_parse_from(["flicker-service", "--config", "ci.yaml", "config", "show"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("ci.yaml")));
    assert!(matches!(
        cli.command,
        Commands::Config(args) if matches!(args.command, ConfigCommands::Show)
    ));

    let cli = Cli::try_parse_from(["flicker-service", "config", "validate", "ci.yaml"]).unwrap();
    match cli.command {
        Commands::Config(args) => match args.command {
            ConfigCommands::Validate { path } => assert_eq!(path, PathBuf::from("ci.yaml")),
            ConfigCommands::Show => panic!("Wrong config command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}
