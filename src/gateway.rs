//! The façade the UI shell drives.
//!
//! One `ChatGateway` value owns the loaded configuration, the store it
//! persists through, and at most one live provider client. The client is
//! present exactly when the active provider has a credential, and is
//! rebuilt synchronously on every mutation that touches the active
//! provider, so a `send` issued after a successful mutation always uses
//! the saved settings.

use crate::backends::{Google, OpenAI};
use crate::chat::{ChatClient, ChatMessage};
use crate::config_store::{Config, ConfigStore};
use crate::error::ChatError;
use crate::registry::ProviderId;

/// Builds provider clients. The seam exists so tests can substitute
/// recording stubs for the HTTP-backed clients.
pub trait ClientFactory: Send + Sync {
    fn build(
        &self,
        provider: ProviderId,
        api_key: &str,
        model: &str,
    ) -> Result<Box<dyn ChatClient>, ChatError>;
}

/// Default factory producing the real HTTP clients.
pub struct HttpFactory;

impl ClientFactory for HttpFactory {
    fn build(
        &self,
        provider: ProviderId,
        api_key: &str,
        model: &str,
    ) -> Result<Box<dyn ChatClient>, ChatError> {
        Ok(match provider {
            ProviderId::Google => Box::new(Google::new(api_key, Some(model.to_string()), None)),
            ProviderId::OpenAI => Box::new(OpenAI::new(api_key, Some(model.to_string()), None)),
        })
    }
}

/// Dispatches messages through the active provider and owns all config
/// mutation.
pub struct ChatGateway {
    store: ConfigStore,
    config: Config,
    factory: Box<dyn ClientFactory>,
    client: Option<Box<dyn ChatClient>>,
}

impl ChatGateway {
    /// Gateway over the given store, using the HTTP-backed clients.
    pub fn new(store: ConfigStore) -> Self {
        Self::with_factory(store, Box::new(HttpFactory))
    }

    /// Gateway with a custom client factory.
    pub fn with_factory(store: ConfigStore, factory: Box<dyn ClientFactory>) -> Self {
        let config = store.load();
        let mut gateway = Self {
            store,
            config,
            factory,
            client: None,
        };
        gateway.rebuild_client();
        gateway
    }

    /// The current configuration. Credentials are plaintext; masking for
    /// display is the caller's concern.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace and persist the whole configuration.
    pub fn replace_config(&mut self, config: Config) -> Result<(), ChatError> {
        let config = config.normalized();
        self.store.save(&config)?;
        self.config = config;
        self.rebuild_client();
        Ok(())
    }

    /// Does the active provider have a non-empty credential?
    pub fn credential_present(&self) -> bool {
        self.config.provider(self.config.active_provider).has_key()
    }

    /// Switch the provider handling outgoing messages.
    pub fn set_active_provider(&mut self, provider: ProviderId) -> Result<(), ChatError> {
        self.config.active_provider = provider;
        self.store.save(&self.config)?;
        self.rebuild_client();
        Ok(())
    }

    /// Store an API key for `provider`.
    pub fn set_credential(
        &mut self,
        provider: ProviderId,
        api_key: impl Into<String>,
    ) -> Result<(), ChatError> {
        self.config.provider_mut(provider).api_key = api_key.into();
        self.store.save(&self.config)?;
        if provider == self.config.active_provider {
            self.rebuild_client();
        }
        Ok(())
    }

    /// Select a model for `provider`. Unknown model ids are accepted and
    /// passed through to the provider.
    pub fn set_model(
        &mut self,
        provider: ProviderId,
        model: impl Into<String>,
    ) -> Result<(), ChatError> {
        self.config.provider_mut(provider).selected_model = model.into();
        self.store.save(&self.config)?;
        if provider == self.config.active_provider {
            self.rebuild_client();
        }
        Ok(())
    }

    /// Forward one user message through the active provider.
    ///
    /// `history` is sent as-is ahead of `message`; whether it includes the
    /// scripted seed turns is the caller's decision. Fails fast with
    /// [`ChatError::NotConfigured`] when no credential is set, without any
    /// network activity.
    pub async fn send(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let client = self.client.as_ref().ok_or(ChatError::NotConfigured)?;
        client.converse(history, message).await
    }

    /// Entry point kept for callers that predate provider switching. Plain
    /// passthrough: awaits [`ChatGateway::send`] and returns its result.
    #[deprecated(note = "use `send`; this forwards to whichever provider is active")]
    pub async fn send_to_gemini(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        self.send(message, history).await
    }

    fn rebuild_client(&mut self) {
        self.client = None;
        let active = self.config.active_provider;
        let settings = self.config.provider(active);
        if !settings.has_key() {
            log::debug!("no credential for {active}, client not built");
            return;
        }
        match self
            .factory
            .build(active, &settings.api_key, &settings.selected_model)
        {
            Ok(client) => self.client = Some(client),
            Err(err) => log::warn!("could not build {active} client: {err}"),
        }
    }
}
