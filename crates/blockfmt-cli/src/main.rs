use anyhow::{Context, Result, bail};
use blockfmt_config::Config;
use blockfmt_engine::FormatOptions;
use blockfmt_syntax::format_source;
use std::{env, path::PathBuf, process};

const USAGE: &str = "Usage: blockfmt-cli <file> [--write] [--config <path>]";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    file: PathBuf,
    write: bool,
    config: Option<PathBuf>,
}

impl Args {
    /// Parse the arguments after the program name.
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut file = None;
        let mut write = false;
        let mut config = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--write" | "-w" => write = true,
                "--config" => {
                    let Some(path) = args.next() else {
                        bail!("--config needs a path");
                    };
                    config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => bail!("unknown option {flag}"),
                _ if file.is_some() => bail!("only one file can be formatted at a time"),
                _ => file = Some(PathBuf::from(arg)),
            }
        }

        let Some(file) = file else {
            bail!("no file given");
        };
        Ok(Self {
            file,
            write,
            config,
        })
    }
}

/// Options from `--config`, else the user config file, else defaults.
fn load_options(explicit: Option<&PathBuf>) -> Result<FormatOptions> {
    let loaded = match explicit {
        Some(path) => Some(
            Config::load_from_path(path)?
                .with_context(|| format!("config file '{}' does not exist", path.display()))?,
        ),
        None => Config::load()?,
    };
    match loaded {
        Some(config) => Ok(config.format),
        None => {
            log::debug!(
                "no config at {}, using defaults",
                Config::config_path().display()
            );
            Ok(FormatOptions::default())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let options = load_options(args.config.as_ref())?;
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;

    let formatted = format_source(&source, &options)
        .with_context(|| format!("failed to format '{}'", args.file.display()))?;
    log::info!(
        "{}: {} edits, {} re-walks",
        args.file.display(),
        formatted.patch.edits.len(),
        formatted.patch.retries
    );

    if args.write {
        if formatted.patch.changed() {
            std::fs::write(&args.file, &formatted.text)
                .with_context(|| format!("failed to write '{}'", args.file.display()))?;
        }
    } else {
        print!("{}", formatted.text);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
