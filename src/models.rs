use crate::phrases::{Phrase, PhraseId};
use crate::presenter::ViewModel;
use crate::press::PressFlags;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PHRASE: &str = "subhanallah";

fn default_phrase() -> PhraseId {
    PhraseId::new(DEFAULT_PHRASE)
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Persisted lifetime record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifetime {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_count: u64,
    #[serde(default = "default_phrase")]
    pub last_phrase: PhraseId,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self {
            total_count: 0,
            last_phrase: default_phrase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub phrase_id: PhraseId,
    pub target: u64,
    pub message: String,
}

impl Completion {
    pub fn new(phrase_id: PhraseId, target: u64) -> Self {
        let message = format!("Completed {target} {phrase_id}!");
        Self {
            phrase_id,
            target,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub target: u64,
    #[serde(flatten)]
    pub view: ViewModel,
    pub press: PressFlags,
}

#[derive(Debug, Serialize)]
pub struct PhrasesResponse {
    pub phrases: Vec<Phrase>,
}

#[derive(Debug, Deserialize)]
pub struct SelectPhraseRequest {
    pub id: PhraseId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressEvent {
    Start,
    End,
    Cancel,
}

#[derive(Debug, Deserialize)]
pub struct PressRequest {
    pub event: PressEvent,
}

#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetAllRequest {
    #[serde(default)]
    pub confirmed: bool,
}
