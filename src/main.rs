//! Pizza intake REPL
//!
//! Runs one order intake conversation on stdin/stdout:
//! - Loads configuration from the environment (`PIZZA_INTAKE__*`)
//! - Connects the form session to the OpenAI backend
//! - Reads user messages line by line until the order is submitted,
//!   cancelled, or input ends

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use pizza_intake::adapters::ai::{OpenAIConfig, OpenAIModel};
use pizza_intake::application::FormSession;
use pizza_intake::config::AppConfig;
use pizza_intake::domain::form::FormSchema;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pizza_intake=info".parse().expect("valid log directive")),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = config.validate() {
        error!("Invalid configuration: {}", err);
        std::process::exit(1);
    }

    let api_key = match config.ai.openai_api_key.as_deref() {
        Some(key) => key.to_string(),
        None => {
            error!("Required configuration missing: OPENAI_API_KEY");
            std::process::exit(1);
        }
    };

    let model_config = OpenAIConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout());
    let model = Arc::new(OpenAIModel::new(model_config));

    let mut session = FormSession::new(model, FormSchema::pizza_order(), config.form.clone());
    info!(session_id = %session.id(), model = %config.ai.model, "pizza intake ready");

    println!("Welcome to the pizza order service. What can I get you?");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("Failed to read input: {}", err);
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.handle_turn(input).await {
            Ok(reply) => println!("{}", reply.output),
            Err(err) => {
                error!("Turn failed: {}", err);
                println!("Sorry, something went wrong on my side. Please say that again.");
            }
        }

        if session.is_closed() {
            break;
        }
    }

    info!(session_id = %session.id(), "session ended");
}
