//! Sends a test message using credentials from the environment.
//!
//! ```sh
//! GRAPH_TENANT_ID=… GRAPH_CLIENT_ID=… GRAPH_CLIENT_SECRET=… \
//! GRAPH_FROM=noreply@example.com GRAPH_TO=someone@example.com \
//! cargo run -p graph-mail --example send_mail
//! ```

use std::env;
use std::sync::Arc;

use graph_auth::{TokenCache, TokenFetcher};
use graph_core::client::ReqwestHttpClient;
use graph_core::config::GraphConfig;
use graph_core::logging::{init_logging, LoggingConfig};
use graph_mail::{Address, MailTransport, Message};

fn var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{} must be set", name))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;

    let config = Arc::new(
        GraphConfig::builder()
            .tenant_id(var("GRAPH_TENANT_ID"))
            .client_id(var("GRAPH_CLIENT_ID"))
            .client_secret(var("GRAPH_CLIENT_SECRET"))
            .from_address(var("GRAPH_FROM"))
            .build()?,
    );

    let http = Arc::new(ReqwestHttpClient::new());
    let fetcher = Arc::new(TokenFetcher::new(config.clone(), http.clone()));
    let tokens = Arc::new(TokenCache::new(fetcher));

    let transport = MailTransport::new(config, tokens, http);

    let message = Message::new("Hello from graph-mail")
        .to(Address::new(var("GRAPH_TO")))
        .text_body("This message was sent through the Graph sendMail endpoint.");

    let recipients = transport.send(&message).await?;
    println!("sent to {} recipient(s)", recipients);

    Ok(())
}
