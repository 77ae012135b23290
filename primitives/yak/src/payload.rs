//! The JSON document Slack expects from an incoming webhook.

use crate::config::Settings;
use crate::error::Result;
use serde::Serialize;

/// How the message avatar is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    /// An emoji code such as `:speech_balloon:`.
    Emoji(String),
    /// An image URL.
    Url(String),
}

impl Icon {
    /// Classifies an icon setting. Values starting with `:` are emoji codes,
    /// any other non-empty value is a URL, and empty means no icon.
    pub fn parse(icon: &str) -> Option<Self> {
        if icon.starts_with(':') {
            Some(Icon::Emoji(icon.to_string()))
        } else if !icon.is_empty() {
            Some(Icon::Url(icon.to_string()))
        } else {
            None
        }
    }
}

/// Incoming webhook payload. Empty fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncomingWebhook {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
}

impl IncomingWebhook {
    /// Builds the payload for `text` using the resolved settings.
    pub fn new(settings: &Settings, text: impl Into<String>) -> Self {
        let mut payload = IncomingWebhook {
            channel: settings.channel.clone(),
            username: settings.username.clone(),
            text: text.into(),
            ..Default::default()
        };

        match Icon::parse(&settings.icon) {
            Some(Icon::Emoji(emoji)) => payload.icon_emoji = emoji,
            Some(Icon::Url(url)) => payload.icon_url = url,
            None => {}
        }

        payload
    }

    /// Serializes the payload to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
