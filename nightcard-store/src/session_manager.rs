//! The session state manager.
//!
//! Owns the live [`SessionState`] and performs the only two transitions:
//! spending a card and resetting the session. Transitions never overlap.

use nightcard_core::{ComfortProvider, ComfortRequest, SessionState, UsageRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::session_store::SessionStore;

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a spend attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendOutcome {
    /// A card was spent and this record appended.
    Spent(UsageRecord),
    /// No cards left. Nothing changed.
    Exhausted,
    /// Another transition is running. Nothing changed.
    Busy,
}

impl SpendOutcome {
    /// Returns the new record, if a card was spent.
    pub fn record(&self) -> Option<&UsageRecord> {
        match self {
            SpendOutcome::Spent(record) => Some(record),
            _ => None,
        }
    }
}

/// The user's answer to the reset confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetApproval {
    /// The user confirmed.
    Confirmed,
    /// The user declined.
    Declined,
}

impl From<bool> for ResetApproval {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            ResetApproval::Confirmed
        } else {
            ResetApproval::Declined
        }
    }
}

/// Result of a reset attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The session is back to its initial state.
    Reset,
    /// The user declined. Nothing changed.
    Declined,
    /// A spend is running. Nothing changed.
    Busy,
}

// ============================================================================
// In-flight Guard
// ============================================================================

/// Holds the transition flag; clears it on drop.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ============================================================================
// Session Manager
// ============================================================================

/// Owns the session and serializes its transitions.
pub struct SessionManager {
    state: RwLock<SessionState>,
    store: SessionStore,
    provider: Arc<dyn ComfortProvider>,
    in_flight: AtomicBool,
    notify: watch::Sender<u64>,
}

impl SessionManager {
    /// Loads the saved session from `store`.
    pub async fn load(store: SessionStore, provider: Arc<dyn ComfortProvider>) -> Self {
        let state = store.load().await;
        Self::with_state(state, store, provider)
    }

    /// Starts from a given state without reading the store.
    pub fn with_state(
        state: SessionState,
        store: SessionStore,
        provider: Arc<dyn ComfortProvider>,
    ) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            state: RwLock::new(state.normalized()),
            store,
            provider,
            in_flight: AtomicBool::new(false),
            notify,
        }
    }

    /// Spends one card and asks the provider for a message.
    ///
    /// The provider call is the only await between the guard check and the
    /// state change; the flag stays held until the new state is saved.
    pub async fn spend(&self, request: &ComfortRequest) -> SpendOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Spend rejected, transition in flight");
            return SpendOutcome::Busy;
        };

        if !self.state.read().await.can_spend() {
            debug!("Spend rejected, no cards left");
            return SpendOutcome::Exhausted;
        }

        debug!(provider = self.provider.name(), emotion = %request.emotion, "Requesting comfort message");
        let message = self.provider.fetch_message(request).await;
        let record = UsageRecord::new(message);

        let snapshot = {
            let mut state = self.state.write().await;
            if !state.apply_spend(record.clone()) {
                // Only reachable if the state was replaced behind the guard.
                return SpendOutcome::Exhausted;
            }
            state.clone()
        };

        info!(id = %record.id, remaining = snapshot.remaining_cards(), "Card spent");
        self.persist(&snapshot).await;
        self.notify_change();
        SpendOutcome::Spent(record)
    }

    /// Resets to three cards and an empty history, if approved.
    pub async fn reset(&self, approval: ResetApproval) -> ResetOutcome {
        if approval == ResetApproval::Declined {
            debug!("Reset declined");
            return ResetOutcome::Declined;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Reset rejected, transition in flight");
            return ResetOutcome::Busy;
        };

        let snapshot = SessionState::default();
        *self.state.write().await = snapshot.clone();

        info!("Session reset");
        self.persist(&snapshot).await;
        self.notify_change();
        ResetOutcome::Reset
    }

    async fn persist(&self, state: &SessionState) {
        if let Err(e) = self.store.save(state).await {
            warn!(error = %e, "Failed to save session, keeping in-memory state");
        }
    }

    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }

    // ========================================================================
    // Read Access
    // ========================================================================

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Cards left to spend.
    pub async fn remaining_cards(&self) -> u32 {
        self.state.read().await.remaining_cards()
    }

    /// Usage history, oldest first.
    pub async fn history(&self) -> Vec<UsageRecord> {
        self.state.read().await.history().to_vec()
    }

    /// Returns true while a transition is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Subscribes to state changes. The value is a change counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Returns the underlying session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the name of the comfort provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("provider", &self.provider.name())
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}
