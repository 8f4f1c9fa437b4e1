use std::io;

use serde_json::json;
use smsalert::integration::{FlowResult, ServiceHost, UserInput};
use smsalert::{ConfigFlow, Integration, NotifyCall};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct PrintingHost;

impl ServiceHost for PrintingHost {
    fn register_service(&mut self, domain: &'static str, service: &'static str) {
        println!("registered {domain}.{service}");
    }

    fn remove_service(&mut self, domain: &'static str, service: &'static str) {
        println!("removed {domain}.{service}");
    }
}

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
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smsalert=info")),
        )
        .init();

    let input = UserInput {
        username: required_env("SMSALERT_USERNAME")?,
        api_key: required_env("SMSALERT_API_KEY")?,
        cleanup_utf8: None,
    };
    let phone = required_env("SMSALERT_PHONE")?;

    let FlowResult::CreateEntry(new_entry) = ConfigFlow::default().step_user(Some(input)) else {
        return Err("setup form rejected the credentials".into());
    };
    let entry = new_entry.into_entry("demo");

    let mut integration = Integration::new(PrintingHost, reqwest::Client::new());
    integration.setup_entry(&entry)?;

    let notify = integration
        .notify_service(&entry.entry_id)
        .ok_or("entry is not active")?;
    let outcome = notify
        .send_message(NotifyCall {
            message: "Hello from the smsalert notify demo.".to_owned(),
            target: Some(json!([phone])),
            data: None,
        })
        .await;
    println!("notify outcome: {outcome:?}");

    integration.unload_entry(&entry.entry_id);
    Ok(())
}
