//! Configuration resolution.
//!
//! Settings are layered lowest to highest: built-in defaults, the config file,
//! `YAK_*` environment variables, explicit flags. Clap folds the environment
//! into the flag values, so only two layers are merged here.

use crate::error::{Result, YakError};
use clap::Parser;
use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "yak.conf";

pub const DEFAULT_CHANNEL: &str = "#general";
pub const DEFAULT_USERNAME: &str = "yakbot";
pub const DEFAULT_ICON: &str = ":speech_balloon:";

/// Long flags that also accept a single leading dash (`-domain=acme`).
const VALUE_FLAGS: &[&str] = &["domain", "token", "channel", "username", "icon", "config"];

/// Posts a message to a Slack incoming webhook.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "yak")]
#[command(version)]
#[command(about = "Posts a message to a Slack incoming webhook")]
pub struct Args {
    /// Slack domain (you.slack.com).
    #[arg(long, env = "YAK_DOMAIN")]
    pub domain: Option<String>,

    /// Secret token for incoming webhook.
    #[arg(long, env = "YAK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Channel to post in [default: #general].
    #[arg(long, env = "YAK_CHANNEL")]
    pub channel: Option<String>,

    /// Username to post as [default: yakbot].
    #[arg(long, env = "YAK_USERNAME")]
    pub username: Option<String>,

    /// Icon URL or emoji [default: :speech_balloon:].
    #[arg(long, env = "YAK_ICON")]
    pub icon: Option<String>,

    /// Config file to read instead of ./yak.conf or ~/.yak.conf.
    #[arg(long, env = "YAK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Message text; words are joined with single spaces.
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl Args {
    /// Parses the process arguments, accepting `-flag` as well as `--flag`.
    pub fn from_cli() -> Self {
        Self::parse_from(normalize_flags(std::env::args_os()))
    }

    /// The message body formed from the positional arguments.
    pub fn text(&self) -> String {
        self.message.join(" ")
    }
}

/// How one leading command-line word is treated.
enum Word {
    /// A known flag, rewritten to its `--` form.
    Flag { rewritten: String, takes_value: bool },
    /// Some other option; clap accepts or rejects it.
    Other,
    /// First message word or `--`; nothing after it is a flag.
    End,
}

fn classify(arg: &OsString) -> Word {
    let Some(word) = arg.to_str() else {
        return Word::End;
    };
    if word == "--" || word == "-" || !word.starts_with('-') {
        return Word::End;
    }

    let body = word.strip_prefix("--").unwrap_or(&word[1..]);
    let (name, value) = match body.split_once('=') {
        Some((name, _)) => (name, true),
        None => (body, false),
    };

    if VALUE_FLAGS.contains(&name) {
        Word::Flag {
            rewritten: format!("--{body}"),
            takes_value: !value,
        }
    } else {
        Word::Other
    }
}

/// Rewrites single-dash long flags (`-domain acme`, `-token=abc`) to the
/// double-dash form clap understands. Rewriting stops at the first word that
/// is not a flag, so message text is never touched. The first item is the
/// binary name and passes through unchanged.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    let mut value_next = false;
    let mut in_flags = true;

    for arg in args {
        if !in_flags {
            out.push(arg);
            continue;
        }
        if value_next {
            value_next = false;
            out.push(arg);
            continue;
        }
        match classify(&arg) {
            Word::Flag {
                rewritten,
                takes_value,
            } => {
                value_next = takes_value;
                out.push(rewritten.into());
            }
            Word::Other => out.push(arg),
            Word::End => {
                in_flags = false;
                out.push(arg);
            }
        }
    }

    out
}

/// Values read from `yak.conf`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub domain: Option<String>,
    pub token: Option<String>,
    pub channel: Option<String>,
    pub username: Option<String>,
    pub icon: Option<String>,
}

impl FileConfig {
    /// Reads and parses a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| YakError::config(path, e))?;
        Self::parse(&raw).map_err(|e| YakError::config(path, e))
    }

    /// Parses TOML, falling back to the older `name value` / `name = value`
    /// lines with bare values. When both fail the TOML error is reported.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        match toml::from_str(raw) {
            Ok(config) => Ok(config),
            Err(e) => Self::parse_flag_lines(raw).ok_or_else(|| e.message().to_string()),
        }
    }

    /// One flag per line, `#` starts a comment line, values are taken
    /// verbatim after trimming.
    fn parse_flag_lines(raw: &str) -> Option<Self> {
        let mut config = FileConfig::default();

        for line in raw.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // The name ends at the first `=` or space, whichever comes first.
            let (name, value) = match line.find(|c: char| c == '=' || c.is_whitespace()) {
                Some(at) => {
                    let rest = line[at..].trim_start();
                    let rest = rest.strip_prefix('=').unwrap_or(rest);
                    (&line[..at], rest.trim())
                }
                None => (line, ""),
            };

            let slot = match name {
                "domain" => &mut config.domain,
                "token" => &mut config.token,
                "channel" => &mut config.channel,
                "username" => &mut config.username,
                "icon" => &mut config.icon,
                _ => return None,
            };
            *slot = Some(value.to_string());
        }

        Some(config)
    }

    /// Loads the config file named by `--config`, or the first file found on
    /// the search path. An explicit path must exist; a missing search-path
    /// file just means no file layer.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config file");
            return Self::from_path(path);
        }

        match first_existing(search_path(dirs::home_dir())) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_path(&path)
            }
            None => {
                tracing::debug!("no config file found");
                Ok(Self::default())
            }
        }
    }
}

/// Candidate config files, in lookup order: `./yak.conf`, then
/// `<home>/.yak.conf`.
fn search_path(home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = home {
        paths.push(home.join(format!(".{CONFIG_FILE}")));
    }
    paths
}

fn first_existing(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.is_file())
}

/// Fully resolved, immutable configuration for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub domain: String,
    pub token: String,
    pub channel: String,
    pub username: String,
    pub icon: String,
}

impl Settings {
    /// Loads the config file for `args` and merges it beneath the flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = FileConfig::load(args.config.as_deref())?;
        Self::merge(args, file)
    }

    /// Merges flag values over file values over built-in defaults, then checks
    /// that the webhook URL can be built. Domain is checked before token.
    pub fn merge(args: &Args, file: FileConfig) -> Result<Self> {
        let pick = |flag: &Option<String>, file: Option<String>, default: &str| {
            flag.clone()
                .or(file)
                .unwrap_or_else(|| default.to_string())
        };

        let settings = Settings {
            domain: pick(&args.domain, file.domain, ""),
            token: pick(&args.token, file.token, ""),
            channel: pick(&args.channel, file.channel, DEFAULT_CHANNEL),
            username: pick(&args.username, file.username, DEFAULT_USERNAME),
            icon: pick(&args.icon, file.icon, DEFAULT_ICON),
        };

        if settings.domain.is_empty() {
            return Err(YakError::MissingDomain);
        }
        if settings.token.is_empty() {
            return Err(YakError::MissingToken);
        }

        tracing::debug!(?settings, "resolved settings");
        Ok(settings)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("domain", &self.domain)
            .field("token", &"<redacted>")
            .field("channel", &self.channel)
            .field("username", &self.username)
            .field("icon", &self.icon)
            .finish()
    }
}
