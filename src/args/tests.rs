use std::path::PathBuf;

use clap::Parser as _;

use super::{BenchArgs, Command, ConfigFormat, ParseFormat};

fn parse(argv: &[&str]) -> Result<BenchArgs, String> {
    BenchArgs::try_parse_from(argv).map_err(|err| err.to_string())
}

#[test]
fn run_accepts_an_ad_hoc_url_with_overrides() -> Result<(), String> {
    let args = parse(&[
        "wrkbench",
        "run",
        "http://localhost:8080/",
        "-d",
        "10",
        "--connections",
        "50",
        "--threads",
        "2",
        "-w",
        "0",
        "-o",
        "out",
    ])?;

    let Command::Run(run) = args.command else {
        return Err("Expected the run subcommand".to_owned());
    };
    if run.url.as_deref() != Some("http://localhost:8080/") {
        return Err(format!("URL lost: {:?}", run.url));
    }
    if run.duration != Some(10) || run.connections != Some(50) || run.warmup != Some(0) {
        return Err("Overrides lost".to_owned());
    }
    if run.output != Some(PathBuf::from("out")) {
        return Err(format!("Output dir lost: {:?}", run.output));
    }
    Ok(())
}

#[test]
fn run_without_url_or_config_still_parses() -> Result<(), String> {
    // Config discovery happens later; the CLI itself allows a bare run.
    let args = parse(&["wrkbench", "run"])?;
    match args.command {
        Command::Run(run) if run.url.is_none() && run.config.is_none() => Ok(()),
        other => Err(format!("Unexpected command: {other:?}")),
    }
}

#[test]
fn init_defaults_to_yaml() -> Result<(), String> {
    let args = parse(&["wrkbench", "init"])?;
    match args.command {
        Command::Init(init) if init.format == ConfigFormat::Yaml && !init.force => Ok(()),
        other => Err(format!("Unexpected command: {other:?}")),
    }
}

#[test]
fn parse_defaults_to_table_output() -> Result<(), String> {
    let args = parse(&["wrkbench", "parse", "results/wrk_api_20260825_120000.txt"])?;
    match args.command {
        Command::Parse(cmd) if cmd.format == ParseFormat::Table && cmd.file.is_some() => Ok(()),
        other => Err(format!("Unexpected command: {other:?}")),
    }
}

#[test]
fn verbose_is_accepted_after_the_subcommand() -> Result<(), String> {
    let args = parse(&["wrkbench", "validate", "-v"])?;
    if !args.verbose {
        return Err("Global verbose flag lost".to_owned());
    }
    Ok(())
}

#[test]
fn unknown_flags_are_rejected() -> Result<(), String> {
    if parse(&["wrkbench", "run", "--not-a-flag"]).is_ok() {
        return Err("Unknown flag accepted".to_owned());
    }
    Ok(())
}
