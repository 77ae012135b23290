//! Yak - Slack Incoming Webhook Poster
//!
//! Posts one message to a Slack incoming webhook and echoes the response.
//!
//! Configuration is layered: built-in defaults, then `yak.conf`, then `YAK_*`
//! environment variables, then flags.
//!
//! # Usage
//!
//! ```bash
//! # Post to #general as yakbot
//! yak --domain acme --token abc123 deploy finished
//!
//! # Different channel, username and an image icon
//! yak --channel "#ops" --username ci --icon https://example.com/ci.png build failed
//! ```
//!
//! Flags may also be written with a single dash (`-domain=acme`,
//! `-channel "#ops"`) until the first word of the message.
//!
//! # Config File
//!
//! `./yak.conf` or `~/.yak.conf` (or `--config <PATH>`), TOML:
//!
//! ```toml
//! domain = "acme"
//! token = "abc123"
//! channel = "#ops"
//! ```
//!
//! Files that are not valid TOML are read as one flag per line with bare
//! values, so older configs keep working:
//!
//! ```text
//! domain acme
//! token = abc123
//! icon :speech_balloon:
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod payload;

pub use config::{Args, FileConfig, Settings};
pub use delivery::Delivery;
pub use error::{Result, YakError};
pub use payload::{Icon, IncomingWebhook};

use reqwest::Client;
use std::io::Write;

/// Resolves settings from `args`, posts the message, and reports the response
/// on `out`.
pub async fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let settings = Settings::resolve(args)?;
    let url = delivery::endpoint(&settings.domain, &settings.token);
    send(&settings, &args.text(), &url, out).await
}

/// Builds the payload for `text` and posts it to `url`.
pub async fn send(settings: &Settings, text: &str, url: &str, out: &mut impl Write) -> Result<()> {
    let payload = IncomingWebhook::new(settings, text).to_json()?;

    tracing::debug!(
        domain = %settings.domain,
        channel = %settings.channel,
        "posting message"
    );

    let client = Client::builder().build()?;
    let delivery = delivery::post(&client, url, &payload).await?;
    delivery.report(out)?;

    Ok(())
}
