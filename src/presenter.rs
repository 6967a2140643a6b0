use crate::models::Completion;
use crate::phrases::{Phrase, PhraseId};
use serde::Serialize;

/// Sink the controller writes display state to after every mutation.
pub trait Presenter {
    fn display_counter(&mut self, counter: u64);
    fn display_session_count(&mut self, count: u64);
    fn display_total_count(&mut self, count: u64);
    fn display_progress(&mut self, percent: u8);
    fn display_phrase(&mut self, phrase: &Phrase);
    fn notify_completion(&mut self, phrase: &PhraseId, target: u64);
    fn highlight_selected(&mut self, phrase: &PhraseId);

    /// Haptic or audio cue on increment. Best effort.
    fn feedback(&mut self) {}
}

/// Presenter backing the web page: keeps whatever was last displayed so
/// polling clients can render it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub counter: u64,
    pub session_count: u64,
    pub total_count: u64,
    pub progress: u8,
    pub phrase: Option<Phrase>,
    pub selected: Option<PhraseId>,
    /// Bumped once per rollover.
    pub completion_seq: u64,
    pub last_completion: Option<Completion>,
    /// Bumped once per increment; the page vibrates when it moves.
    pub feedback_seq: u64,
}

impl Presenter for ViewModel {
    fn display_counter(&mut self, counter: u64) {
        self.counter = counter;
    }

    fn display_session_count(&mut self, count: u64) {
        self.session_count = count;
    }

    fn display_total_count(&mut self, count: u64) {
        self.total_count = count;
    }

    fn display_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    fn display_phrase(&mut self, phrase: &Phrase) {
        self.phrase = Some(phrase.clone());
    }

    fn notify_completion(&mut self, phrase: &PhraseId, target: u64) {
        self.completion_seq = self.completion_seq.saturating_add(1);
        self.last_completion = Some(Completion::new(phrase.clone(), target));
    }

    fn highlight_selected(&mut self, phrase: &PhraseId) {
        self.selected = Some(phrase.clone());
    }

    fn feedback(&mut self) {
        self.feedback_seq = self.feedback_seq.saturating_add(1);
    }
}
