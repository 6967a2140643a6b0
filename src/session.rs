//! Counter session controller.
//!
//! Owns the per-session counters, the lifetime total and the press-timing
//! machine. Every mutation is pushed to the [`Presenter`] and, for
//! increments and resets, written to the [`LifetimeStore`].

use crate::errors::TasbihError;
use crate::keys::KeyCommand;
use crate::models::{Lifetime, SessionSnapshot};
use crate::phrases::{PhraseCatalog, PhraseId};
use crate::presenter::{Presenter, ViewModel};
use crate::press::{PressFlags, PressTimer, PressTiming};
use crate::storage::LifetimeStore;
use std::num::NonZeroU64;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_TARGET: u64 = 33;

/// `min(100, round(counter / target * 100))`, rounding halves up.
pub fn compute_progress_percent(counter: u64, target: NonZeroU64) -> u8 {
    let target = u128::from(target.get());
    let scaled = (u128::from(counter) * 200 + target) / (2 * target);
    scaled.min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_phrase: PhraseId,
    pub counter: u64,
    pub session_count: u64,
    pub target: NonZeroU64,
}

pub struct Tasbih<S, P> {
    catalog: PhraseCatalog,
    session: SessionState,
    total_count: u64,
    press: PressTimer,
    store: S,
    presenter: P,
}

impl<S: LifetimeStore, P: Presenter> Tasbih<S, P> {
    /// Loads the lifetime record and pushes the initial state to the sink.
    pub fn restore(
        catalog: PhraseCatalog,
        target: NonZeroU64,
        timing: PressTiming,
        store: S,
        presenter: P,
    ) -> Self {
        let mut current_phrase = catalog.default_phrase().id.clone();
        let mut total_count = 0;

        if let Some(stored) = store.load() {
            total_count = stored.total_count;
            if catalog.contains(&stored.last_phrase) {
                current_phrase = stored.last_phrase;
            } else {
                warn!(phrase = %stored.last_phrase, "stored phrase unknown, using default");
            }
        }
        info!(total_count, phrase = %current_phrase, "restored tasbih");

        let mut tasbih = Self {
            catalog,
            session: SessionState {
                current_phrase,
                counter: 0,
                session_count: 0,
                target,
            },
            total_count,
            press: PressTimer::new(timing),
            store,
            presenter,
        };
        tasbih.refresh();
        tasbih
    }

    pub fn select_phrase(&mut self, id: &PhraseId) -> Result<(), TasbihError> {
        if !self.catalog.contains(id) {
            return Err(TasbihError::UnknownPhrase(id.clone()));
        }
        self.session.current_phrase = id.clone();
        self.session.counter = 0;
        debug!(phrase = %id, "phrase selected");
        self.refresh();
        Ok(())
    }

    pub fn increment(&mut self) {
        let session = &mut self.session;
        session.counter = session.counter.saturating_add(1);
        session.session_count = session.session_count.saturating_add(1);
        self.total_count = self.total_count.saturating_add(1);

        if session.counter >= session.target.get() {
            session.counter = 0;
            info!(phrase = %session.current_phrase, target = session.target.get(), "round completed");
            self.presenter
                .notify_completion(&session.current_phrase, session.target.get());
        }

        self.presenter.feedback();
        self.refresh();
        self.persist();
    }

    pub fn reset_session(&mut self) {
        self.session.counter = 0;
        self.session.session_count = 0;
        self.refresh();
        self.persist();
    }

    /// Zeroes every count if `confirm` agrees. Returns whether it did.
    pub fn reset_all(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            debug!("full reset declined");
            return false;
        }
        self.session.counter = 0;
        self.session.session_count = 0;
        self.total_count = 0;
        info!("all counts reset");
        self.refresh();
        self.persist();
        true
    }

    pub fn progress_percent(&self) -> u8 {
        compute_progress_percent(self.session.counter, self.session.target)
    }

    pub fn press_start(&mut self, now: Instant) {
        self.press.begin(now);
    }

    /// Applies the hold increments due at `now`. Returns how many ran.
    pub fn press_tick(&mut self, now: Instant) -> u32 {
        let due = self.press.advance(now);
        for _ in 0..due {
            self.increment();
        }
        due
    }

    pub fn press_end(&mut self) {
        self.press.release();
    }

    pub fn press_cancel(&mut self) {
        self.press.cancel();
    }

    /// Tap or click on the primary control. Returns whether it counted.
    pub fn primary_action(&mut self) -> bool {
        if !self.press.take_primary_action() {
            debug!("primary action suppressed after long press");
            return false;
        }
        self.increment();
        true
    }

    pub fn key_press(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Increment => self.increment(),
            KeyCommand::ResetSession => self.reset_session(),
        }
    }

    pub fn press_deadline(&self) -> Option<Instant> {
        self.press.next_deadline()
    }

    pub fn press_flags(&self) -> PressFlags {
        self.press.flags()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn lifetime(&self) -> Lifetime {
        Lifetime {
            total_count: self.total_count,
            last_phrase: self.session.current_phrase.clone(),
        }
    }

    pub fn catalog(&self) -> &PhraseCatalog {
        &self.catalog
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn refresh(&mut self) {
        let session = &self.session;
        if let Some(phrase) = self.catalog.get(&session.current_phrase) {
            self.presenter.display_phrase(phrase);
        }
        self.presenter.highlight_selected(&session.current_phrase);
        self.presenter.display_counter(session.counter);
        self.presenter.display_session_count(session.session_count);
        self.presenter.display_total_count(self.total_count);
        self.presenter
            .display_progress(compute_progress_percent(session.counter, session.target));
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.lifetime()) {
            warn!("failed to persist lifetime total: {err}");
        }
    }
}

impl<S: LifetimeStore> Tasbih<S, ViewModel> {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            target: self.session.target.get(),
            view: self.presenter.clone(),
            press: self.press.flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::Phrase;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        view: ViewModel,
        completions: Vec<(PhraseId, u64)>,
        feedback: u32,
    }

    impl Presenter for Recorder {
        fn display_counter(&mut self, counter: u64) {
            self.view.display_counter(counter);
        }
        fn display_session_count(&mut self, count: u64) {
            self.view.display_session_count(count);
        }
        fn display_total_count(&mut self, count: u64) {
            self.view.display_total_count(count);
        }
        fn display_progress(&mut self, percent: u8) {
            self.view.display_progress(percent);
        }
        fn display_phrase(&mut self, phrase: &Phrase) {
            self.view.display_phrase(phrase);
        }
        fn notify_completion(&mut self, phrase: &PhraseId, target: u64) {
            self.completions.push((phrase.clone(), target));
        }
        fn highlight_selected(&mut self, phrase: &PhraseId) {
            self.view.highlight_selected(phrase);
        }
        fn feedback(&mut self) {
            self.feedback += 1;
        }
    }

    fn target(value: u64) -> NonZeroU64 {
        NonZeroU64::new(value).unwrap()
    }

    fn tasbih_with(store: Arc<MemoryStore>, goal: u64) -> Tasbih<Arc<MemoryStore>, Recorder> {
        Tasbih::restore(
            PhraseCatalog::default(),
            target(goal),
            PressTiming::default(),
            store,
            Recorder::default(),
        )
    }

    fn tasbih() -> Tasbih<Arc<MemoryStore>, Recorder> {
        tasbih_with(Arc::new(MemoryStore::default()), DEFAULT_TARGET)
    }

    #[test]
    fn thirty_three_increments_complete_one_round() {
        let mut tasbih = tasbih();
        for _ in 0..32 {
            tasbih.increment();
        }
        assert!(tasbih.presenter().completions.is_empty());

        tasbih.increment();
        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.session().session_count, 33);
        assert_eq!(tasbih.total_count(), 33);
        assert_eq!(
            tasbih.presenter().completions,
            vec![(PhraseId::new("subhanallah"), 33)]
        );
        assert_eq!(tasbih.presenter().feedback, 33);
    }

    #[test]
    fn restores_total_and_phrase_from_store() {
        let store = Arc::new(MemoryStore::with_record(Lifetime {
            total_count: 7,
            last_phrase: PhraseId::new("alhamdulillah"),
        }));
        let tasbih = tasbih_with(store, DEFAULT_TARGET);

        assert_eq!(tasbih.total_count(), 7);
        assert_eq!(tasbih.session().current_phrase.as_str(), "alhamdulillah");
        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.presenter().view.total_count, 7);
        assert_eq!(
            tasbih.presenter().view.selected,
            Some(PhraseId::new("alhamdulillah"))
        );
    }

    #[test]
    fn unknown_stored_phrase_falls_back_to_default() {
        let store = Arc::new(MemoryStore::with_record(Lifetime {
            total_count: 2,
            last_phrase: PhraseId::new("gone"),
        }));
        let tasbih = tasbih_with(store, DEFAULT_TARGET);
        assert_eq!(tasbih.session().current_phrase.as_str(), "subhanallah");
        assert_eq!(tasbih.total_count(), 2);
    }

    #[test]
    fn increments_are_persisted() {
        let store = Arc::new(MemoryStore::default());
        let mut tasbih = tasbih_with(Arc::clone(&store), DEFAULT_TARGET);
        tasbih.select_phrase(&PhraseId::new("allahuakbar")).unwrap();
        assert_eq!(store.record(), None);

        tasbih.increment();
        assert_eq!(
            store.record(),
            Some(Lifetime {
                total_count: 1,
                last_phrase: PhraseId::new("allahuakbar"),
            })
        );
    }

    #[test]
    fn select_phrase_resets_counter_only() {
        let mut tasbih = tasbih();
        for _ in 0..5 {
            tasbih.increment();
        }
        tasbih.select_phrase(&PhraseId::new("astaghfirullah")).unwrap();

        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.session().session_count, 5);
        assert_eq!(tasbih.total_count(), 5);
        assert_eq!(tasbih.presenter().view.counter, 0);
        assert_eq!(
            tasbih.presenter().view.phrase.as_ref().map(|p| p.id.as_str()),
            Some("astaghfirullah")
        );
    }

    #[test]
    fn unknown_phrase_leaves_state_unchanged() {
        let mut tasbih = tasbih();
        tasbih.increment();
        let before = tasbih.session().clone();

        let err = tasbih.select_phrase(&PhraseId::new("nope")).unwrap_err();
        assert!(matches!(err, TasbihError::UnknownPhrase(_)));
        assert_eq!(tasbih.session(), &before);
    }

    #[test]
    fn reset_session_keeps_total() {
        let mut tasbih = tasbih();
        for _ in 0..4 {
            tasbih.increment();
        }
        tasbih.reset_session();

        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.session().session_count, 0);
        assert_eq!(tasbih.total_count(), 4);
    }

    #[test]
    fn reset_all_requires_confirmation() {
        let store = Arc::new(MemoryStore::default());
        let mut tasbih = tasbih_with(Arc::clone(&store), DEFAULT_TARGET);
        for _ in 0..3 {
            tasbih.increment();
        }

        assert!(!tasbih.reset_all(|| false));
        assert_eq!(tasbih.session().counter, 3);
        assert_eq!(tasbih.total_count(), 3);

        assert!(tasbih.reset_all(|| true));
        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.session().session_count, 0);
        assert_eq!(tasbih.total_count(), 0);
        assert_eq!(store.record().map(|r| r.total_count), Some(0));
    }

    #[test]
    fn failed_writes_do_not_disturb_memory_state() {
        let mut tasbih = tasbih_with(Arc::new(MemoryStore::failing()), DEFAULT_TARGET);
        tasbih.increment();
        tasbih.increment();
        assert_eq!(tasbih.total_count(), 2);
        assert_eq!(tasbih.presenter().view.total_count, 2);
    }

    #[test]
    fn progress_rounds_and_caps() {
        assert_eq!(compute_progress_percent(0, target(33)), 0);
        assert_eq!(compute_progress_percent(1, target(33)), 3);
        assert_eq!(compute_progress_percent(16, target(33)), 48);
        assert_eq!(compute_progress_percent(1, target(8)), 13);
        assert_eq!(compute_progress_percent(33, target(33)), 100);
        assert_eq!(compute_progress_percent(50, target(33)), 100);
    }

    #[test]
    fn held_press_counts_three_and_swallows_click() {
        let mut tasbih = tasbih();
        let start = Instant::now();
        tasbih.press_start(start);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(300)), 1);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(450)), 1);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(600)), 1);
        tasbih.press_end();

        assert!(!tasbih.primary_action());
        assert_eq!(tasbih.session().session_count, 3);
        assert_eq!(tasbih.press_deadline(), None);
    }

    #[test]
    fn touch_hold_followed_by_emulated_mouse_events_counts_three() {
        let mut tasbih = tasbih();
        let start = Instant::now();
        tasbih.press_start(start);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(600)), 3);
        tasbih.press_end();

        tasbih.press_start(start + Duration::from_millis(610));
        tasbih.press_end();
        assert!(!tasbih.primary_action());
        assert_eq!(tasbih.session().session_count, 3);
    }

    #[test]
    fn view_model_feedback_moves_once_per_increment() {
        let mut tasbih = Tasbih::restore(
            PhraseCatalog::default(),
            target(3),
            PressTiming::default(),
            MemoryStore::default(),
            ViewModel::default(),
        );
        assert_eq!(tasbih.snapshot().view.feedback_seq, 0);

        for _ in 0..4 {
            tasbih.increment();
        }
        tasbih.reset_session();
        tasbih.select_phrase(&PhraseId::new("alhamdulillah")).unwrap();

        let snapshot = tasbih.snapshot();
        assert_eq!(snapshot.view.feedback_seq, 4);
        assert_eq!(snapshot.view.completion_seq, 1);
        assert_eq!(snapshot.target, 3);
    }

    #[test]
    fn quick_tap_counts_once_through_primary_action() {
        let mut tasbih = tasbih();
        let start = Instant::now();
        tasbih.press_start(start);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(100)), 0);
        tasbih.press_end();

        assert!(tasbih.primary_action());
        assert_eq!(tasbih.session().session_count, 1);
        assert!(!tasbih.press_flags().auto_repeat_active);
    }

    #[test]
    fn auto_repeat_rolls_over_like_any_increment() {
        let mut tasbih = tasbih_with(Arc::new(MemoryStore::default()), 3);
        let start = Instant::now();
        tasbih.press_start(start);
        assert_eq!(tasbih.press_tick(start + Duration::from_millis(600)), 3);
        tasbih.press_cancel();

        assert_eq!(tasbih.session().counter, 0);
        assert_eq!(tasbih.presenter().completions.len(), 1);
    }

    #[test]
    fn keyboard_commands_route_to_operations() {
        let mut tasbih = tasbih();
        tasbih.key_press(KeyCommand::Increment);
        tasbih.key_press(KeyCommand::Increment);
        assert_eq!(tasbih.session().counter, 2);

        tasbih.key_press(KeyCommand::ResetSession);
        assert_eq!(tasbih.session().session_count, 0);
        assert_eq!(tasbih.total_count(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Increment,
        Select(usize),
        ResetSession,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => Just(Op::Increment),
            1 => (0usize..5).prop_map(Op::Select),
            1 => Just(Op::ResetSession),
        ]
    }

    proptest! {
        #[test]
        fn counter_stays_below_target(goal in 1u64..50, ops in prop::collection::vec(op(), 0..200)) {
            let mut tasbih = tasbih_with(Arc::new(MemoryStore::default()), goal);
            let ids: Vec<PhraseId> = tasbih.catalog().iter().map(|p| p.id.clone()).collect();
            let mut since_reset = 0u64;
            let mut expected_completions = 0usize;
            let mut increments = 0u64;

            for op in ops {
                match op {
                    Op::Increment => {
                        let prior = tasbih.session().counter;
                        tasbih.increment();
                        increments += 1;
                        since_reset += 1;
                        if since_reset == goal {
                            since_reset = 0;
                            expected_completions += 1;
                        }
                        prop_assert_eq!(tasbih.session().counter, (prior + 1) % goal);
                    }
                    Op::Select(index) => {
                        tasbih.select_phrase(&ids[index]).unwrap();
                        since_reset = 0;
                    }
                    Op::ResetSession => {
                        tasbih.reset_session();
                        since_reset = 0;
                    }
                }
                prop_assert!(tasbih.session().counter < goal);
                prop_assert_eq!(tasbih.session().counter, since_reset);
            }

            prop_assert_eq!(tasbih.total_count(), increments);
            prop_assert_eq!(tasbih.presenter().completions.len(), expected_completions);
        }

        #[test]
        fn total_adds_to_restored_value(restored in 0u64..10_000, n in 0usize..100) {
            let store = Arc::new(MemoryStore::with_record(Lifetime {
                total_count: restored,
                last_phrase: PhraseId::new("subhanallah"),
            }));
            let mut tasbih = tasbih_with(store, DEFAULT_TARGET);
            for _ in 0..n {
                tasbih.increment();
            }
            prop_assert_eq!(tasbih.total_count(), restored + n as u64);
        }
    }
}
