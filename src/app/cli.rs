use anyhow::Result;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

pub const USAGE: &str = "ftg [-e pattern1,pattern2,...] [-o output_path] [-i] [-c] [-h] [-v]";

const AUTHOR_URL: &str = "https://github.com/easttexaselectronics";
const DONATE_URL: &str = "https://www.buymeacoffee.com/easttexaselectronics";

#[derive(Parser, Debug)]
#[command(
    name = "ftg",
    about = "File Tree Generator - writes a tree view of the current directory to a markdown file",
    override_usage = USAGE,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    ignore_errors = true
)]
pub struct Cli {
    /// Exclude directories or files (comma-separated)(.git,node_modules,.vscode)
    #[arg(short = 'e', long, value_name = "PATTERNS", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Specify an output location; default output is in the pwd
    #[arg(short = 'o', long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Interactive mode to select items to exclude
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Clear the exclusion list given so far
    #[arg(short = 'c', long, action = ArgAction::Count)]
    pub clear: u8,

    /// Sort entries by name instead of directory order
    #[arg(short = 's', long)]
    pub sort: bool,

    /// Show this help message and exit
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Show version information and exit
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    Help(String),
    Version,
    Run(ParsedArgs),
}

/// Flags relevant to a tree run, with `-c` already applied to the `-e` names.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub exclude: Vec<String>,
    pub output: Option<PathBuf>,
    pub interactive: bool,
    pub clear: bool,
    pub sort: bool,
}

pub fn parse_args<I, T>(args: I) -> Result<CliAction>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = Cli::command();
    let args = retain_known_args(&command, args.into_iter().map(Into::into).collect());
    let matches = command.try_get_matches_from_mut(args)?;
    let cli = Cli::from_arg_matches(&matches)?;

    if cli.help {
        return Ok(CliAction::Help(command.render_help().to_string()));
    }
    if cli.version {
        return Ok(CliAction::Version);
    }

    Ok(CliAction::Run(ParsedArgs {
        exclude: exclusions_after_clear(&matches),
        output: cli.output,
        interactive: cli.interactive,
        clear: cli.clear > 0,
        sort: cli.sort,
    }))
}

pub fn version_text() -> String {
    format!(
        "File Tree Generator version: {}\nLeave us a star at {}\nBuy me a coffee: {}",
        env!("CARGO_PKG_VERSION"),
        AUTHOR_URL,
        DONATE_URL
    )
}

/// Names from every `-e` that appears after the last `-c`, split on commas.
fn exclusions_after_clear(matches: &ArgMatches) -> Vec<String> {
    let cleared_at = match matches.value_source("clear") {
        Some(ValueSource::CommandLine) => matches.index_of("clear"),
        _ => None,
    };

    let (Some(values), Some(indices)) = (
        matches.get_many::<String>("exclude"),
        matches.indices_of("exclude"),
    ) else {
        return Vec::new();
    };

    values
        .zip(indices)
        .filter(|(_, index)| cleared_at.map_or(true, |cleared| *index > cleared))
        .flat_map(|(value, _)| value.split(','))
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Flags clap knows about.
struct KnownFlags {
    /// Long name for each short letter.
    shorts: HashMap<char, String>,
    /// Whether each long flag takes a value.
    longs: HashMap<String, bool>,
}

impl KnownFlags {
    fn from_command(command: &Command) -> Self {
        let mut shorts = HashMap::new();
        let mut longs = HashMap::new();
        for arg in command.get_arguments() {
            let Some(long) = arg.get_long() else {
                continue;
            };
            if let Some(short) = arg.get_short() {
                shorts.insert(short, long.to_string());
            }
            longs.insert(long.to_string(), arg.get_action().takes_values());
        }
        Self { shorts, longs }
    }

    fn takes_value(&self, long: &str) -> bool {
        self.longs.get(long).copied().unwrap_or(false)
    }
}

/// A short-flag cluster such as `-ci` or `-ce dist`, spelled out as long names.
struct Cluster<'k, 'c> {
    switches: Vec<&'k str>,
    /// The value flag ending the cluster, with its attached value if any.
    value_flag: Option<(&'k str, Option<&'c str>)>,
}

/// Returns `None` when any letter before the value flag is unknown.
fn split_cluster<'k, 'c>(known: &'k KnownFlags, cluster: &'c str) -> Option<Cluster<'k, 'c>> {
    let mut switches = Vec::new();
    for (pos, c) in cluster.char_indices() {
        let long = known.shorts.get(&c)?.as_str();
        if known.takes_value(long) {
            let rest = &cluster[pos + c.len_utf8()..];
            let attached = (!rest.is_empty()).then(|| rest.strip_prefix('=').unwrap_or(rest));
            return Some(Cluster {
                switches,
                value_flag: Some((long, attached)),
            });
        }
        switches.push(long);
    }
    Some(Cluster {
        switches,
        value_flag: None,
    })
}

fn with_value(long: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(format!("--{}=", long));
    arg.push(value);
    arg
}

/// Drops unknown flags, stray words, and a value flag left without a value at the end.
///
/// Clap stops at the first bad token when errors are ignored, which would also drop
/// every valid flag after it. Filtering first keeps the rest of the line intact.
/// Value flags are passed on as `--long=value`, so a value starting with `-` stays a value.
fn retain_known_args(command: &Command, args: Vec<OsString>) -> Vec<OsString> {
    let known = KnownFlags::from_command(command);
    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(token) = arg.to_str() else {
            log::debug!("Ignoring argument {:?}", arg);
            continue;
        };

        if token == "--" {
            break;
        }

        if let Some(long) = token.strip_prefix("--") {
            let (name, attached) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            match known.longs.get(name) {
                None => log::debug!("Ignoring unknown flag {}", token),
                Some(false) => kept.push(format!("--{}", name).into()),
                Some(true) => match attached {
                    Some(value) => kept.push(with_value(name, OsStr::new(value))),
                    None => match args.next() {
                        Some(value) => kept.push(with_value(name, &value)),
                        None => log::debug!("Ignoring {} without a value", token),
                    },
                },
            }
            continue;
        }

        let cluster = match token.strip_prefix('-') {
            Some(cluster) if !cluster.is_empty() => cluster,
            _ => {
                log::debug!("Ignoring argument {}", token);
                continue;
            }
        };

        let Some(cluster) = split_cluster(&known, cluster) else {
            log::debug!("Ignoring unknown flag {}", token);
            continue;
        };

        for long in cluster.switches {
            kept.push(format!("--{}", long).into());
        }
        match cluster.value_flag {
            Some((long, Some(value))) => kept.push(with_value(long, OsStr::new(value))),
            Some((long, None)) => match args.next() {
                Some(value) => kept.push(with_value(long, &value)),
                None => log::debug!("Ignoring {} without a value", token),
            },
            None => {}
        }
    }

    kept
}
