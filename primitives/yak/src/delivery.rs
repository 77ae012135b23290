//! Posting the payload to Slack and echoing what comes back.

use crate::error::Result;
use reqwest::{Client, StatusCode};
use std::io::Write;

/// Builds the incoming-webhook URL for a Slack domain and token.
pub fn endpoint(domain: &str, token: &str) -> String {
    format!("https://{domain}.slack.com/services/hooks/incoming-webhook?token={token}")
}

/// What the webhook returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Delivery {
    /// Writes the response the way the user sees it: a warning line for any
    /// status other than 200, then the raw body and a newline.
    pub fn report(&self, out: &mut impl Write) -> std::io::Result<()> {
        if self.status != StatusCode::OK {
            writeln!(
                out,
                "Warning: received non-200 status {}",
                self.status.as_u16()
            )?;
        }
        out.write_all(&self.body)?;
        writeln!(out)?;
        out.flush()
    }
}

/// Sends `payload` as the `payload` field of a form-encoded POST and reads the
/// whole response body. A non-200 status is returned, not treated as an error.
pub async fn post(client: &Client, url: &str, payload: &str) -> Result<Delivery> {
    let response = client
        .post(url)
        .form(&[("payload", payload)])
        .send()
        .await?;

    let status = response.status();
    tracing::debug!(%status, "webhook responded");

    let body = response.bytes().await?.to_vec();
    Ok(Delivery { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: StatusCode, body: &str) -> String {
        let delivery = Delivery {
            status,
            body: body.as_bytes().to_vec(),
        };
        let mut out = Vec::new();
        delivery.report(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_endpoint_template() {
        assert_eq!(
            endpoint("acme", "abc123"),
            "https://acme.slack.com/services/hooks/incoming-webhook?token=abc123"
        );
    }

    #[test]
    fn test_report_ok_echoes_body() {
        assert_eq!(report(StatusCode::OK, "ok"), "ok\n");
    }

    #[test]
    fn test_report_non_200_warns_then_echoes() {
        assert_eq!(
            report(StatusCode::NOT_FOUND, "No service"),
            "Warning: received non-200 status 404\nNo service\n"
        );
    }

    #[test]
    fn test_report_other_success_codes_still_warn() {
        assert!(report(StatusCode::CREATED, "").starts_with("Warning: received non-200 status 201"));
    }

    #[test]
    fn test_report_empty_body_is_just_newline() {
        assert_eq!(report(StatusCode::OK, ""), "\n");
    }
}
