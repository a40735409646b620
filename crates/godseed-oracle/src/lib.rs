//! Oracle card export/import for offline god consultation.
//!
//! The engine's three gods run as in-process policies, but the world can
//! also be carried to an external oracle by hand: `export` renders the
//! current world state into a PNG card with the consultation JSON
//! embedded in a text chunk, and `import` extracts an oracle's response
//! (the same rule-delta schema the in-process gods produce) for the
//! operator to apply.
//!
//! # Modules
//!
//! - [`card`] -- Consultation card and response schemas, built from the
//!   shared log store.
//! - [`image`] -- PNG rendering and embedded-chunk I/O.

pub mod card;
pub mod error;
pub mod image;

pub use card::{ActorSummary, ConsultationCard, DEFAULT_QUERY, GodResponse, WorldSummary, build_card};
pub use error::CardError;
pub use image::{
    ChunkKind, DATA_KEYWORD, RESPONSE_KEYWORD, read_chunk, read_response, write_card,
};
