use std::io;

use smsalert::{ApiVersion, Credentials, SmsAlertClient};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> io::Result<String> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smsalert=debug")),
        )
        .init();

    let username = required_env("SMSALERT_USERNAME")?;
    let api_key = required_env("SMSALERT_API_KEY")?;
    let phone = required_env("SMSALERT_PHONE")?;
    let message = std::env::var("SMSALERT_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsalert demo.".to_owned());
    let api_version = if std::env::var_os("SMSALERT_LEGACY").is_some() {
        ApiVersion::LegacyBulk
    } else {
        ApiVersion::V2
    };

    let client = SmsAlertClient::builder(Credentials::new(username, api_key)?)
        .api_version(api_version)
        .build()?;
    client.send_sms(&phone, &message, true).await?;
    println!("sent via {}", client.endpoint());

    Ok(())
}
