//! Resolution orchestrator - turns a raw track into exactly one outcome.
//!
//! The flow for one request:
//! 1. Normalize the raw track (no network on failure)
//! 2. Signature lookup on the lyrics database
//! 3. On "no result", optionally fall back to a search with the time left
//! 4. Deliver one [`ResolutionOutcome`]
//!
//! The whole flow races the caller's cancellation token and a single
//! deadline fixed at request arrival. Whichever finishes first decides the
//! outcome; the losing work is dropped together with any late result.
//!
//! The state machine itself is the pure [`ResolutionState::transition`];
//! [`LyricsResolver`] performs the I/O each state asks for.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::domain::{
    ClientError, FailureReason, InvalidTrackError, LyricsResult, LyricsVariant, RawTrack,
    ResolutionOutcome, SearchQuery, Track,
};
use super::normalize::TextFilters;
use super::progress::{ProgressEvent, ProgressSink, ProgressStage};
use super::traits::LyricsApi;

/// Budget used when the host does not specify one
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

/// Longest budget honoured; larger values are clamped to it
pub const MAX_BUDGET: Duration = Duration::from_secs(24 * 60 * 60);

/// Deadline `budget` after `start`, with the budget clamped to [`MAX_BUDGET`].
pub fn deadline_after(start: Instant, budget: Duration) -> Instant {
    start + budget.min(MAX_BUDGET)
}

/// Read-only settings for one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Search when the signature lookup finds nothing
    pub fallback_enabled: bool,
    pub filters: TextFilters,
    /// Which lyrics field [`Resolution::lyrics`] surfaces
    pub preferred_variant: LyricsVariant,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            filters: TextFilters::default(),
            preferred_variant: LyricsVariant::Synced,
        }
    }
}

/// Inbound request from the host
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    pub track: RawTrack,
    /// Total time allowed, shared by both lookups
    pub budget: Duration,
}

impl ResolutionRequest {
    pub fn new(track: RawTrack, budget: Duration) -> Self {
        Self { track, budget }
    }
}

/// Terminal delivery, tagged with the request's correlation handle
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub external_id: Option<String>,
    pub outcome: ResolutionOutcome,
    pub preferred_variant: LyricsVariant,
    pub elapsed: Duration,
}

impl Resolution {
    /// The lyrics text to surface, if the resolution succeeded.
    pub fn lyrics(&self) -> Option<&str> {
        match &self.outcome {
            ResolutionOutcome::Success(result) => result.lyrics_for(self.preferred_variant),
            _ => None,
        }
    }
}

/// Where a resolution currently is
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Idle,
    Normalizing,
    PrimaryLookup(Track),
    FallbackLookup(Track),
    Terminal(ResolutionOutcome),
}

/// Inputs that move the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionEvent {
    Started,
    Normalized(Result<Track, InvalidTrackError>),
    PrimaryCompleted(Result<LyricsResult, ClientError>),
    FallbackCompleted(Result<Vec<LyricsResult>, ClientError>),
    DeadlineElapsed,
    Cancelled,
}

/// Facts the transition function needs besides state and event
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub fallback_enabled: bool,
    /// Time left before the shared deadline
    pub remaining: Duration,
}

impl ResolutionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Normalizing => "normalizing",
            Self::PrimaryLookup(_) => "primary lookup",
            Self::FallbackLookup(_) => "fallback lookup",
            Self::Terminal(_) => "terminal",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Compute the next state. `Terminal` is absorbing.
    pub fn transition(self, event: ResolutionEvent, ctx: &TransitionContext) -> Self {
        use ResolutionEvent as E;

        match (self, event) {
            (Self::Terminal(outcome), _) => Self::Terminal(outcome),

            (_, E::Cancelled) => Self::Terminal(ResolutionOutcome::Cancelled),
            (_, E::DeadlineElapsed) => Self::Terminal(ResolutionOutcome::Timeout),

            (Self::Idle, E::Started) => Self::Normalizing,

            (Self::Normalizing, E::Normalized(Ok(track))) => Self::PrimaryLookup(track),
            (Self::Normalizing, E::Normalized(Err(err))) => {
                let reason = FailureReason::InvalidTrack(err);
                Self::Terminal(ResolutionOutcome::TransientFailure(reason))
            }

            (Self::PrimaryLookup(_), E::PrimaryCompleted(Ok(result))) => {
                Self::Terminal(ResolutionOutcome::Success(result))
            }
            (Self::PrimaryLookup(track), E::PrimaryCompleted(Err(ClientError::NoResult)))
                if ctx.fallback_enabled =>
            {
                if ctx.remaining.is_zero() {
                    Self::Terminal(ResolutionOutcome::Timeout)
                } else {
                    Self::FallbackLookup(track)
                }
            }
            (Self::PrimaryLookup(_), E::PrimaryCompleted(Err(err))) => {
                Self::Terminal(ResolutionOutcome::from_client_error(err))
            }

            (Self::FallbackLookup(_), E::FallbackCompleted(Ok(results))) => {
                match results.into_iter().next() {
                    Some(first) => Self::Terminal(ResolutionOutcome::Success(first)),
                    None => Self::Terminal(ResolutionOutcome::NotFound),
                }
            }
            (Self::FallbackLookup(_), E::FallbackCompleted(Err(err))) => {
                Self::Terminal(ResolutionOutcome::from_client_error(err))
            }

            (state, event) => {
                tracing::error!(
                    target: "resolver",
                    "Event {:?} is not valid in state {}",
                    event,
                    state.name()
                );
                Self::Terminal(ResolutionOutcome::TransientFailure(
                    FailureReason::MalformedRequest(format!(
                        "unexpected event in state {}",
                        state.name()
                    )),
                ))
            }
        }
    }
}

/// Single-use coordinator for one resolution attempt.
///
/// [`LyricsResolver::resolve`] consumes the resolver, so one instance can
/// never deliver two outcomes.
pub struct LyricsResolver<C, S> {
    client: C,
    sink: S,
    config: ResolverConfig,
    state: ResolutionState,
}

impl<C: LyricsApi, S: ProgressSink> LyricsResolver<C, S> {
    pub fn new(client: C, config: ResolverConfig, sink: S) -> Self {
        Self {
            client,
            sink,
            config,
            state: ResolutionState::Idle,
        }
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// Run the resolution to its single terminal outcome.
    ///
    /// Cancelling `cancel` or exceeding `request.budget` ends the attempt
    /// immediately; any in-flight client call is abandoned.
    pub async fn resolve(
        mut self,
        request: ResolutionRequest,
        cancel: CancellationToken,
    ) -> Resolution {
        let started = Instant::now();
        let deadline = deadline_after(started, request.budget);
        let in_flight = cancel.child_token();
        let external_id = request.track.external_id.clone();

        tracing::debug!(
            target: "resolver",
            "Resolving {:?} (budget {:?})",
            request.track.title,
            request.budget
        );

        let interruption = tokio::select! {
            biased;
            _ = cancel.cancelled() => Some(ResolutionEvent::Cancelled),
            _ = tokio::time::sleep_until(deadline) => Some(ResolutionEvent::DeadlineElapsed),
            _ = self.drive(&request.track, deadline, &in_flight) => None,
        };
        in_flight.cancel();

        if let Some(event) = interruption {
            self.apply(event, deadline);
        }

        let outcome = match self.state {
            ResolutionState::Terminal(outcome) => outcome,
            other => {
                tracing::error!(target: "resolver", "Resolution stopped in state {}", other.name());
                ResolutionOutcome::TransientFailure(FailureReason::MalformedRequest(format!(
                    "resolution stopped in state {}",
                    other.name()
                )))
            }
        };

        let elapsed = started.elapsed();
        match &outcome {
            ResolutionOutcome::Success(result) => tracing::info!(
                target: "resolver",
                "Found lyrics for {:?}: {} - {} ({:?})",
                request.track.title,
                result.artist_name,
                result.track_name,
                elapsed
            ),
            ResolutionOutcome::NotFound => tracing::info!(
                target: "resolver",
                "No lyrics for {:?} ({:?})",
                request.track.title,
                elapsed
            ),
            other => tracing::warn!(
                target: "resolver",
                "Resolution of {:?} ended with {}: {:?}",
                request.track.title,
                other.label(),
                other
            ),
        }

        Resolution {
            external_id,
            outcome,
            preferred_variant: self.config.preferred_variant,
            elapsed,
        }
    }

    /// Perform the work of each state until a terminal state is reached.
    async fn drive(&mut self, raw: &RawTrack, deadline: Instant, cancel: &CancellationToken) {
        loop {
            let event = match &self.state {
                ResolutionState::Idle => {
                    self.sink.emit(ProgressEvent::new(ProgressStage::Preparing));
                    ResolutionEvent::Started
                }
                ResolutionState::Normalizing => {
                    ResolutionEvent::Normalized(raw.normalize(&self.config.filters))
                }
                ResolutionState::PrimaryLookup(track) => {
                    self.sink.emit(ProgressEvent::with_detail(
                        ProgressStage::QueryingPrimary,
                        track.display_query(),
                    ));
                    ResolutionEvent::PrimaryCompleted(
                        self.client.fetch_by_signature(track, deadline, cancel).await,
                    )
                }
                ResolutionState::FallbackLookup(track) => {
                    self.sink.emit(ProgressEvent::with_detail(
                        ProgressStage::FallingBack,
                        track.display_query(),
                    ));
                    let query = SearchQuery::BySignature(track.clone());
                    ResolutionEvent::FallbackCompleted(
                        self.client.search(&query, deadline, cancel).await,
                    )
                }
                ResolutionState::Terminal(_) => return,
            };
            self.apply(event, deadline);
        }
    }

    fn apply(&mut self, event: ResolutionEvent, deadline: Instant) {
        let ctx = TransitionContext {
            fallback_enabled: self.config.fallback_enabled,
            remaining: deadline.saturating_duration_since(Instant::now()),
        };
        let previous = std::mem::replace(&mut self.state, ResolutionState::Idle);
        let from = previous.name();
        self.state = previous.transition(event, &ctx);
        tracing::debug!(target: "resolver", "{} -> {}", from, self.state.name());
    }
}
