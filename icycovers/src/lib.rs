//! # icycovers - Cover artwork resolution for ICY radio streams
//!
//! `icycovers` resolves cover images for "artist - title" track
//! announcements embedded in internet-radio streams. It tries sources in
//! priority order with a bounded wait per request, and treats missing
//! artwork as a normal, silent outcome.
//!
//! ## Resolution order
//!
//! - **Station override endpoint** (AzuraCast-style): when the station
//!   supplies its own artwork endpoint, it is queried for a
//!   `thumbnail_url` and that image is fetched. If the endpoint yields
//!   nothing usable, resolution ends with no artwork; the public search
//!   is intentionally not consulted in this branch.
//! - **Public track search**: otherwise the announcement is searched on
//!   the public track-search endpoint, the low-resolution artwork URL of
//!   the best match is upgraded to its 500x500 variant, and that image is
//!   fetched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use icycovers::ArtworkClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArtworkClient::builder()
//!         .user_agent("my-radio-app/1.0")
//!         .build()?;
//!
//!     // Station endpoint takes priority when configured
//!     let image = client
//!         .resolve("Artist", "Track", Some("https://station.example/api/nowplaying"))
//!         .await;
//!
//!     if let Some(image) = image {
//!         println!("{} bytes via {:?}", image.len(), image.origin);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::{
    ArtworkClient, ClientBuilder, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCH_BASE,
    DEFAULT_USER_AGENT,
};
pub use error::{Error, Result};
pub use models::{
    hires_artwork_url, ArtworkImage, ArtworkOrigin, SearchResponse, SearchResult,
    StationArtworkResponse,
};
