//! Static provider metadata used to drive setup UIs and defaults.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Supported chat providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Google,
    OpenAI,
}

impl ProviderId {
    /// Every supported provider, in catalog order.
    pub const ALL: [ProviderId; 2] = [ProviderId::Google, ProviderId::OpenAI];

    /// The identifier used in the persisted document and at the boundary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Google => "google",
            ProviderId::OpenAI => "openai",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(ProviderId::Google),
            "openai" => Ok(ProviderId::OpenAI),
            _ => Err(ChatError::UnknownProvider(s.to_string())),
        }
    }
}

/// One selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub name: &'static str,
}

/// Display metadata for one provider. Static, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct ProviderMetadata {
    pub id: ProviderId,
    pub display_name: &'static str,
    /// Label for the credential input in a setup dialog
    pub key_label: &'static str,
    /// Help text shown next to the credential input
    pub key_help: &'static str,
    /// Selectable models, first entry is the default
    pub models: &'static [ModelDescriptor],
}

impl ProviderMetadata {
    pub fn default_model(&self) -> &'static str {
        self.models[0].id
    }

    /// Advisory only: a `selectedModel` outside this list is still passed
    /// through to the provider, since provider-side catalogs change
    /// independently of this software.
    pub fn is_known_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.id == model)
    }
}

static CATALOG: [ProviderMetadata; 2] = [
    ProviderMetadata {
        id: ProviderId::Google,
        display_name: "Google Gemini",
        key_label: "Gemini API key",
        key_help: "Create a key in Google AI Studio under \"Get API key\".",
        models: &[
            ModelDescriptor {
                id: "gemini-2.0-flash",
                name: "Gemini 2.0 Flash",
            },
            ModelDescriptor {
                id: "gemini-1.5-pro",
                name: "Gemini 1.5 Pro",
            },
            ModelDescriptor {
                id: "gemini-1.5-flash",
                name: "Gemini 1.5 Flash",
            },
        ],
    },
    ProviderMetadata {
        id: ProviderId::OpenAI,
        display_name: "OpenAI",
        key_label: "OpenAI API key",
        key_help: "Create a key at platform.openai.com/api-keys.",
        models: &[
            ModelDescriptor {
                id: "gpt-4o-mini",
                name: "GPT-4o mini",
            },
            ModelDescriptor {
                id: "gpt-4o",
                name: "GPT-4o",
            },
            ModelDescriptor {
                id: "gpt-3.5-turbo",
                name: "GPT-3.5 Turbo",
            },
        ],
    },
];

/// Metadata for one provider.
pub fn describe(id: ProviderId) -> &'static ProviderMetadata {
    match id {
        ProviderId::Google => &CATALOG[0],
        ProviderId::OpenAI => &CATALOG[1],
    }
}

/// The full catalog in stable order.
pub fn all() -> &'static [ProviderMetadata] {
    &CATALOG
}
