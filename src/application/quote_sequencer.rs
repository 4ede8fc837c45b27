//! Request sequencing for superseding quotes
//!
//! Every quote request takes a ticket; only the newest ticket may publish its
//! result. A slow request that resolves after a newer one is dropped.

use tokio::sync::RwLock;
use tracing::debug;

use super::quote_service::{QuoteRequest, QuoteService, RouteQuote};

/// Monotonic request token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuoteTicket(u64);

impl QuoteTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What the caller should display
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteState {
    Idle,
    Loading,
    Ready(RouteQuote),
    /// Quote finished but no route has liquidity
    NoRoute,
    Failed(String),
}

/// Result of one quote attempt
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Quoted(RouteQuote),
    NoRoute,
    Failed(String),
}

impl From<Option<RouteQuote>> for QuoteOutcome {
    fn from(quote: Option<RouteQuote>) -> Self {
        match quote {
            Some(quote) => QuoteOutcome::Quoted(quote),
            None => QuoteOutcome::NoRoute,
        }
    }
}

#[derive(Debug)]
struct Inner {
    latest: u64,
    state: QuoteState,
}

#[derive(Debug)]
pub struct QuoteSequencer {
    inner: RwLock<Inner>,
}

impl Default for QuoteSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSequencer {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                latest: 0,
                state: QuoteState::Idle,
            }),
        }
    }

    /// Issue a new ticket, superseding every earlier one
    pub async fn begin(&self) -> QuoteTicket {
        let mut inner = self.inner.write().await;
        inner.latest += 1;
        inner.state = QuoteState::Loading;
        QuoteTicket(inner.latest)
    }

    /// Publish `outcome` if `ticket` is still the latest; returns whether it was applied
    pub async fn complete(&self, ticket: QuoteTicket, outcome: QuoteOutcome) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 != inner.latest {
            debug!("Discarding stale quote #{} (latest #{})", ticket.0, inner.latest);
            return false;
        }
        inner.state = match outcome {
            QuoteOutcome::Quoted(quote) => QuoteState::Ready(quote),
            QuoteOutcome::NoRoute => QuoteState::NoRoute,
            QuoteOutcome::Failed(message) => QuoteState::Failed(message),
        };
        true
    }

    pub async fn state(&self) -> QuoteState {
        self.inner.read().await.state.clone()
    }

    pub async fn latest(&self) -> QuoteTicket {
        QuoteTicket(self.inner.read().await.latest)
    }

    /// Run one quote through `service` under a fresh ticket
    pub async fn run(&self, service: &QuoteService, request: &QuoteRequest) -> bool {
        let ticket = self.begin().await;
        let outcome = QuoteOutcome::from(service.quote(request).await);
        self.complete(ticket, outcome).await
    }
}
