//! In-process implementations of the capability ports.
//!
//! Record every call so the use cases can be exercised without a desktop.
//! Also used for `MED_REMINDER_DRY_RUN` wiring.

use crate::domain::{DomainError, MedicineReminder, Notification, PermissionState};
use crate::ports::{Notifier, PermissionProvider, ReminderSource, SoundPlayer};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Fixed permission state; `request` answers with a preset outcome.
pub struct StaticPermission {
    state: Mutex<PermissionState>,
    answer: PermissionState,
    requests: AtomicUsize,
}

impl StaticPermission {
    pub fn new(state: PermissionState) -> Self {
        Self::with_answer(state, state)
    }

    /// Start in `state`; a prompt from `Default` moves to `answer`.
    pub fn with_answer(state: PermissionState, answer: PermissionState) -> Self {
        Self {
            state: Mutex::new(state),
            answer,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn set(&self, state: PermissionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

#[async_trait::async_trait]
impl PermissionProvider for StaticPermission {
    async fn state(&self) -> PermissionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn request(&self) -> Result<PermissionState, DomainError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == PermissionState::Default {
            *state = self.answer;
        }
        Ok(*state)
    }
}

/// Keeps every shown notification.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose `show` always errors (after recording the attempt).
    pub fn failing() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn show(&self, notification: &Notification) -> Result<(), DomainError> {
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        if self.fail {
            return Err(DomainError::Notify("notification daemon unavailable".into()));
        }
        Ok(())
    }
}

/// Logs the notification instead of displaying it.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn show(&self, notification: &Notification) -> Result<(), DomainError> {
        info!(title = %notification.title, body = %notification.body, "[DRY RUN] notification");
        Ok(())
    }
}

/// Logs instead of playing.
pub struct LogSound;

#[async_trait::async_trait]
impl SoundPlayer for LogSound {
    async fn play(&self) -> Result<(), DomainError> {
        info!("[DRY RUN] alarm sound");
        Ok(())
    }
}

/// Counts playback attempts.
#[derive(Default)]
pub struct CountingSound {
    plays: AtomicUsize,
    fail: bool,
}

impl CountingSound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every play attempt is counted and then rejected, like a blocked autoplay.
    pub fn failing() -> Self {
        Self {
            plays: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SoundPlayer for CountingSound {
    async fn play(&self) -> Result<(), DomainError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::Sound("playback rejected".into()));
        }
        Ok(())
    }
}

/// Scripted reminder source: each fetch pops the next response; once the
/// script runs out it keeps returning `[]`.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<MedicineReminder>, DomainError>>>,
    fetches: AtomicUsize,
    taken: Mutex<Vec<i64>>,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Vec<MedicineReminder>, DomainError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Every fetch sleeps `delay` before answering, simulating a slow server.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn taken(&self) -> Vec<i64> {
        self.taken.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl ReminderSource for ScriptedSource {
    async fn fetch_due(&self) -> Result<Vec<MedicineReminder>, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn mark_taken(&self, medicine_id: i64) -> Result<(), DomainError> {
        self.taken
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(medicine_id);
        Ok(())
    }
}
