//! Selectable chat model catalog.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenRouter,
    Local,
}

/// One entry in the model picker.
#[derive(Debug, Clone, Copy)]
pub struct ChatModel {
    pub id: &'static str,
    pub label: &'static str,
    pub provider: ModelProvider,
    pub description: Option<&'static str>,
}

/// Models offered by the backend's router.
pub const CHAT_MODELS: &[ChatModel] = &[
    ChatModel {
        id: "meta-llama/llama-3.3-70b-instruct:free",
        label: "LLaMA 3.3 70B",
        provider: ModelProvider::OpenRouter,
        description: Some("Best overall reasoning & chat quality"),
    },
    ChatModel {
        id: "mistralai/mistral-small-3.1-24b-instruct:free",
        label: "Mistral Small 24B",
        provider: ModelProvider::OpenRouter,
        description: Some("Strong instruction following"),
    },
    ChatModel {
        id: "google/gemma-3-12b-it:free",
        label: "Gemma 3 12B",
        provider: ModelProvider::OpenRouter,
        description: None,
    },
    ChatModel {
        id: "qwen/qwen3-next-80b-a3b-instruct:free",
        label: "Qwen 3 Next 80B",
        provider: ModelProvider::OpenRouter,
        description: Some("Long-context reasoning"),
    },
];

/// The model selected when the user has no saved preference.
pub fn default_model() -> &'static str {
    CHAT_MODELS[0].id
}

pub fn find_model(id: &str) -> Option<&'static ChatModel> {
    CHAT_MODELS.iter().find(|m| m.id == id)
}
