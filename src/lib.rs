//! Core services for the Latent Chat desktop overlay.
//!
//! The overlay window itself (frameless always-on-top chrome, hotkey
//! toggling, transcript rendering) lives in the shell that embeds this
//! crate. What lives here is everything underneath it:
//!
//! - [`config_store`]: the persisted provider/model/API-key document,
//!   including migration of the older flat on-disk shape
//! - [`registry`]: static metadata describing each supported provider
//! - [`backends`]: one API client per provider, normalized onto the
//!   [`ChatClient`] capability
//! - [`gateway`]: the [`ChatGateway`] façade the shell calls for
//!   configuration access and message dispatch
//!
//! ```no_run
//! use latent_chat::{ChatGateway, ConfigStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut gateway = ChatGateway::new(ConfigStore::new()?);
//!     gateway.set_credential("google".parse()?, "my-api-key")?;
//!     let reply = gateway.send("Hello there", &[]).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod backends;
pub mod chat;
pub mod config_store;
pub mod error;
pub mod gateway;
pub mod registry;

pub use chat::{seed_history, ChatClient, ChatMessage, ChatMessageBuilder, ChatRole};
pub use config_store::{migrate_legacy, Config, ConfigStore, ProviderSettings};
pub use error::ChatError;
pub use gateway::{ChatGateway, ClientFactory, HttpFactory};
pub use registry::{describe, ModelDescriptor, ProviderId, ProviderMetadata};
