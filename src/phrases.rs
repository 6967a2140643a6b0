use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseId(String);

impl PhraseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhraseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub id: PhraseId,
    pub arabic: String,
    pub english: String,
}

impl Phrase {
    pub fn new(id: &str, arabic: &str, english: &str) -> Self {
        Self {
            id: PhraseId::new(id),
            arabic: arabic.to_string(),
            english: english.to_string(),
        }
    }
}

/// Ordered set of selectable phrases. The first entry is the default.
#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    phrases: Vec<Phrase>,
}

impl PhraseCatalog {
    /// Returns `None` for an empty list.
    pub fn new(phrases: Vec<Phrase>) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self { phrases })
    }

    pub fn default_phrase(&self) -> &Phrase {
        &self.phrases[0]
    }

    pub fn get(&self, id: &PhraseId) -> Option<&Phrase> {
        self.phrases.iter().find(|phrase| &phrase.id == id)
    }

    pub fn contains(&self, id: &PhraseId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phrase> {
        self.phrases.iter()
    }
}

impl Default for PhraseCatalog {
    fn default() -> Self {
        Self {
            phrases: vec![
                Phrase::new("subhanallah", "سُبْحَانَ ٱللَّٰهِ", "Glory be to Allah"),
                Phrase::new("alhamdulillah", "ٱلْحَمْدُ لِلَّٰهِ", "All praise is due to Allah"),
                Phrase::new("allahuakbar", "ٱللَّٰهُ أَكْبَرُ", "Allah is the Greatest"),
                Phrase::new("astaghfirullah", "أَسْتَغْفِرُ ٱللَّٰهَ", "I seek forgiveness from Allah"),
                Phrase::new(
                    "lailahaillallah",
                    "لَا إِلَٰهَ إِلَّا ٱللَّٰهُ",
                    "There is no god but Allah",
                ),
            ],
        }
    }
}
