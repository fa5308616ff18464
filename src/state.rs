//! Observable session state for the back-office resources.
//!
//! Each resource keeps its own snapshot ([`ResourceState`] or
//! [`TransactionState`]) behind a mutex. Requests are tracked with tickets:
//! a response only lands if no newer request was started on the same lane,
//! so a slow early fetch can never overwrite the result of a later one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{BackofficeError, Result};
use crate::models::{Pagination, Transaction};
use crate::query::TransactionFilters;

/// Snapshot of a simple resource collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Records as last returned by the service.
    pub items: Vec<T>,
    /// Whether any request on this resource is in flight.
    pub loading: bool,
    /// Message of the last failure, if any.
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    #[inline]
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Snapshot of the transaction browser.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionState {
    /// Transactions on the current page.
    pub items: Vec<Transaction>,
    /// Transaction opened by a single-record lookup.
    pub current: Option<Transaction>,
    /// Position of the current page.
    pub pagination: Pagination,
    /// Filters used by the next listing.
    pub filters: TransactionFilters,
    /// Whether any request on transactions is in flight.
    pub loading: bool,
    /// Message of the last failure, if any.
    pub error: Option<String>,
}

impl Default for TransactionState {
    #[inline]
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            pagination: Pagination::default(),
            filters: TransactionFilters::initial(),
            loading: false,
            error: None,
        }
    }
}

/// Access to the flags every snapshot carries.
pub(crate) trait Tracked {
    /// Loading flag.
    fn loading_mut(&mut self) -> &mut bool;
    /// Last error message.
    fn error_mut(&mut self) -> &mut Option<String>;
}

impl<T> Tracked for ResourceState<T> {
    #[inline]
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }

    #[inline]
    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

impl Tracked for TransactionState {
    #[inline]
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }

    #[inline]
    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

/// Independent ordering domains within one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lane {
    /// Collection listings.
    List,
    /// Single-record lookups.
    Detail,
}

/// Proof that a request was started; consumed on completion.
#[derive(Debug)]
#[must_use]
pub(crate) struct Ticket {
    /// Lane and sequence number, or `None` for unfenced mutations.
    fence: Option<(Lane, u64)>,
}

/// Container state plus request bookkeeping.
#[derive(Debug)]
struct Slot<S> {
    /// The observable snapshot.
    state: S,
    /// Requests started but not yet completed.
    in_flight: usize,
    /// Sequence number of the newest list request.
    latest_list: u64,
    /// Sequence number of the newest detail request.
    latest_detail: u64,
}

impl<S> Slot<S> {
    /// Mutable access to the newest sequence number of a lane.
    const fn latest_mut(&mut self, lane: Lane) -> &mut u64 {
        match lane {
            Lane::List => &mut self.latest_list,
            Lane::Detail => &mut self.latest_detail,
        }
    }

    /// Whether a response for `ticket` is still wanted.
    const fn accepts(&self, ticket: &Ticket) -> bool {
        match ticket.fence {
            None => true,
            Some((Lane::List, seq)) => seq == self.latest_list,
            Some((Lane::Detail, seq)) => seq == self.latest_detail,
        }
    }
}

/// A snapshot guarded by a mutex with per-lane stale-response fencing.
///
/// The lock is only held for the duration of a state transition, never
/// across a request.
#[derive(Debug)]
pub(crate) struct Fenced<S> {
    /// All state behind a single mutex.
    inner: Mutex<Slot<S>>,
}

impl<S: Tracked> Fenced<S> {
    /// Wraps an initial snapshot.
    pub(crate) const fn new(state: S) -> Self {
        Self {
            inner: Mutex::new(Slot {
                state,
                in_flight: 0,
                latest_list: 0,
                latest_detail: 0,
            }),
        }
    }

    /// Acquires the lock, mapping poisoning to an error.
    fn lock(&self) -> Result<MutexGuard<'_, Slot<S>>> {
        self.inner.lock().map_err(|err| lock_error(&err))
    }

    /// Returns a copy of the current snapshot.
    pub(crate) fn snapshot(&self) -> Result<S>
    where
        S: Clone,
    {
        Ok(self.lock()?.state.clone())
    }

    /// Runs `f` against the snapshot without touching request bookkeeping.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let mut slot = self.lock()?;
        Ok(f(&mut slot.state))
    }

    /// Records a failure that happened before any request was sent.
    pub(crate) fn reject(&self, message: String) -> Result<()> {
        self.with_state(|state| *state.error_mut() = Some(message))
    }

    /// Starts a request: marks the container loading, clears the error and
    /// runs `prepare` in the same critical section.
    ///
    /// `lane` is `None` for mutations, whose results always apply.
    pub(crate) fn begin(
        &self,
        lane: Option<Lane>,
        prepare: impl FnOnce(&mut S),
    ) -> Result<Ticket> {
        let mut slot = self.lock()?;
        slot.in_flight = slot.in_flight.saturating_add(1);
        let fence = lane.map(|which| {
            let latest = slot.latest_mut(which);
            *latest = latest.wrapping_add(1);
            (which, *latest)
        });
        *slot.state.loading_mut() = true;
        *slot.state.error_mut() = None;
        prepare(&mut slot.state);
        Ok(Ticket { fence })
    }

    /// Finishes a request.
    ///
    /// A current success runs `apply`; a current failure stores
    /// `"{failure}: {err}"` as the error. Stale outcomes leave the snapshot
    /// alone. The outcome is handed back to the caller either way.
    pub(crate) fn complete<T>(
        &self,
        ticket: Ticket,
        outcome: Result<T>,
        failure: &str,
        apply: impl FnOnce(&mut S, &T),
    ) -> Result<T> {
        let mut slot = self.lock()?;
        slot.in_flight = slot.in_flight.saturating_sub(1);
        if slot.accepts(&ticket) {
            match outcome.as_ref() {
                Ok(value) => apply(&mut slot.state, value),
                Err(err) => {
                    tracing::debug!(error = %err, "request failed");
                    *slot.state.error_mut() = Some(format!("{failure}: {err}"));
                }
            }
        } else {
            tracing::debug!(
                lane = ?ticket.fence.map(|(lane, _)| lane),
                ok = outcome.is_ok(),
                "discarding stale response"
            );
        }
        let loading = slot.in_flight > 0;
        *slot.state.loading_mut() = loading;
        outcome
    }
}

/// Maps a poisoned lock to a state error.
fn lock_error<T>(err: &PoisonError<T>) -> BackofficeError {
    BackofficeError::State(err.to_string())
}
