//! Line-oriented harness for the chat core.
//!
//! Stands in for the overlay shell during development: reads user turns
//! from stdin, forwards them through the gateway, and prints replies.

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;

use latent_chat::{
    registry, seed_history, ChatGateway, ChatMessage, ChatRole, ConfigStore, ProviderId,
};

#[derive(Parser)]
#[command(name = "latent", about = "Chat through the configured provider")]
struct Args {
    /// Switch the active provider (google, openai) before starting
    #[arg(long)]
    provider: Option<String>,

    /// Store an API key for the active provider
    #[arg(long, value_name = "KEY")]
    set_key: Option<String>,

    /// Select a model for the active provider
    #[arg(long)]
    model: Option<String>,

    /// Print the configuration (keys masked) and exit
    #[arg(long)]
    show_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let store = ConfigStore::new().context("locating config directory")?;
    let mut gateway = ChatGateway::new(store);

    if let Some(provider) = &args.provider {
        gateway.set_active_provider(provider.parse()?)?;
    }
    let active = gateway.config().active_provider;
    if let Some(key) = &args.set_key {
        gateway.set_credential(active, key.clone())?;
    }
    if let Some(model) = &args.model {
        if !registry::describe(active).is_known_model(model) {
            eprintln!("note: {model} is not in the built-in catalog for {active}, using it anyway");
        }
        gateway.set_model(active, model.clone())?;
    }

    if args.show_config {
        print_config(&gateway);
        return Ok(());
    }

    if !gateway.credential_present() {
        let meta = registry::describe(active);
        bail!(
            "no {} set for {}. {} Then run with --set-key.",
            meta.key_label,
            meta.display_name,
            meta.key_help
        );
    }

    // Greet with the scripted opener the overlay shows; it stays display-only.
    if let Some(greeting) = seed_history().iter().rfind(|m| m.role == ChatRole::Model) {
        println!("{}", greeting.content);
    }

    let mut history: Vec<ChatMessage> = Vec::new();
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match gateway.send(text, &history).await {
            Ok(reply) => {
                println!("{reply}");
                history.push(ChatMessage::user().content(text).build());
                history.push(ChatMessage::model().content(&reply).build());
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    Ok(())
}

fn print_config(gateway: &ChatGateway) {
    let config = gateway.config();
    println!("active provider: {}", config.active_provider);
    for id in ProviderId::ALL {
        let settings = config.provider(id);
        println!(
            "{}: model={} key={}",
            id,
            settings.selected_model,
            mask(&settings.api_key)
        );
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        "(unset)".to_string()
    } else if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        let head: String = key.chars().take(4).collect();
        format!("{head}****")
    }
}
