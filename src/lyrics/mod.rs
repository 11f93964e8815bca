//! Lyrics resolution - finds lyrics for a track within a time budget.
//!
//! # Architecture
//!
//! This module follows the same separation as our other API integrations:
//! - **Domain models** (`domain.rs`) - Internal types for tracks, results and outcomes
//! - **Normalizer** (`normalize.rs`) - Cleans raw metadata into a query key
//! - **API DTOs** (`lrclib/dto.rs`) - Exact LRCLIB response shapes
//! - **Adapter** (`lrclib/adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`lrclib/client.rs`) - HTTP client with deadline and cancellation
//! - **Traits** (`traits.rs`) - Seam for mocking the client
//! - **Progress** (`progress.rs`) - One-way status reporting
//! - **Resolver** (`resolver.rs`) - State machine sequencing lookup and fallback
//!
//! # Usage
//!
//! ```ignore
//! use lyrics::{LrclibClient, LyricsResolver, ResolverConfig, ResolutionRequest, TracingSink};
//!
//! let client = LrclibClient::new()?;
//! let resolver = LyricsResolver::new(client, ResolverConfig::default(), TracingSink);
//! let request = ResolutionRequest::new(raw_track, Duration::from_secs(8));
//! let resolution = resolver.resolve(request, CancellationToken::new()).await;
//! println!("{}", resolution.lyrics().unwrap_or("(no lyrics)"));
//! ```

pub mod domain;
pub mod lrclib;
pub mod normalize;
pub mod progress;
pub mod resolver;
pub mod traits;

pub use domain::{
    ClientError, FailureReason, InvalidTrackError, LyricsResult, LyricsVariant, RawTrack,
    ResolutionOutcome, SearchQuery, Track,
};
pub use lrclib::LrclibClient;
pub use normalize::{TextFilters, normalize};
pub use progress::{
    ChannelSink, MemorySink, NullSink, ProgressEvent, ProgressSink, ProgressStage, TracingSink,
};
pub use resolver::{
    DEFAULT_BUDGET, LyricsResolver, MAX_BUDGET, Resolution, ResolutionRequest, ResolverConfig,
    deadline_after,
};
pub use traits::LyricsApi;
