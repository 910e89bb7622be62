//! simcfg CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use simcfg_runtime::{LoadConfig, Location, ModelLoader, Shell, standard_types};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    file: Option<String>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    log_file: Option<bool>,
    input_report: bool,
    save: Option<PathBuf>,
    max_brace_depth: Option<usize>,
    max_include_depth: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_count(args: &[String], i: usize, flag: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let value = args
        .get(i)
        .ok_or_else(|| format!("{flag} requires a value"))?;
    Ok(value
        .parse()
        .map_err(|_| format!("invalid {flag} value: {value}"))?)
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--log" => config.log_file = Some(true),
            "--no-log" => config.log_file = Some(false),
            "--input-report" => config.input_report = true,
            "--save" => {
                i += 1;
                let path = args.get(i).ok_or("--save requires a path")?;
                config.save = Some(PathBuf::from(path));
            }
            "--max-brace-depth" => {
                i += 1;
                config.max_brace_depth = Some(parse_count(&args, i, "--max-brace-depth")?);
            }
            "--max-include-depth" => {
                i += 1;
                config.max_include_depth = Some(parse_count(&args, i, "--max-include-depth")?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.file.is_some() {
                    return Err("only one configuration file may be given".into());
                }
                config.file = Some(path.to_string());
            }
        }
        i += 1;
    }

    Ok(config)
}

fn load_config(cli: &CliConfig) -> LoadConfig {
    let mut config = LoadConfig::new();
    if let Some(enabled) = cli.log_file {
        config = config.with_log_file(enabled);
    }
    if let Some(depth) = cli.max_brace_depth {
        config = config.with_max_brace_depth(depth);
    }
    if let Some(depth) = cli.max_include_depth {
        config = config.with_max_include_depth(depth);
    }
    config
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_version {
        println!("simcfg {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let mut loader = ModelLoader::new(standard_types()).with_config(load_config(&cli));

    if let Some(file) = &cli.file {
        // A missing root file aborts here.
        loader.load_root(Location::parse(file))?;
        let errors = loader.errors();
        let warnings = loader.warnings();
        eprintln!("Loaded {file}: {} entities, {errors} error(s), {warnings} warning(s)", loader.model().len());
        if let Some(first) = loader.first_error() {
            eprintln!("\x1b[31mFirst error: {first}\x1b[0m");
        }

        if cli.input_report {
            let path = loader.write_report(None)?;
            eprintln!("Wrote input report {}", path.display());
        }
        if let Some(target) = &cli.save {
            loader.save(target)?;
        }
    } else if cli.batch_mode {
        return Err("batch mode requires a configuration file".into());
    }

    if cli.batch_mode {
        let summary = loader.finish()?;
        if let Some(log) = &summary.log_file {
            eprintln!("See {} for details", log.display());
        }
        return Ok(if summary.succeeded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut shell = Shell::new(loader)?;
    if cli.file.is_some() {
        shell = shell.without_banner();
    }
    shell.run()?;

    let summary = shell.loader_mut().finish()?;
    if let Some(log) = &summary.log_file {
        eprintln!("Errors and warnings were written to {}", log.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        "\x1b[1msimcfg\x1b[0m - Load, check, and edit simulation model configurations

\x1b[1mUSAGE:\x1b[0m
    simcfg [OPTIONS] [FILE]

\x1b[1mARGUMENTS:\x1b[0m
    [FILE]    Root configuration file (.cfg), or <container>!/<path>

\x1b[1mOPTIONS:\x1b[0m
    -h, --help                 Print help information
    -V, --version              Print version information
    -b, --batch                Load the file and exit; fails if any error was logged
    --log                      Write a .log trace file beside the configuration (default)
    --no-log                   Keep the trace in memory
    --input-report             Write a .inp report of every non-default value
    --save <PATH>              Save the session delta to PATH after loading
    --max-brace-depth <N>      Maximum brace nesting in one record (default 2)
    --max-include-depth <N>    Maximum Include nesting (default 32)

\x1b[1mENVIRONMENT:\x1b[0m
    RUST_LOG                   Diagnostic filter, e.g. RUST_LOG=simcfg_runtime=debug

\x1b[1mEXAMPLES:\x1b[0m
    simcfg model.cfg                  Load model.cfg, then start the shell
    simcfg -b model.cfg               Check model.cfg and exit
    simcfg -b --input-report m.cfg    Check m.cfg and write m.inp

\x1b[1mSHELL COMMANDS:\x1b[0m
    <record>             Apply a record as an edit, e.g. S1 ServiceTime {{ 5 s }}
    :save <path>         Save the session delta
    :report [path]       Write the input report
    :show <entity>       List an entity's keyword values
    :quit                Exit (asks if there are unsaved changes)
    Ctrl+D               Exit
    Ctrl+C               Cancel current input"
    );
}
