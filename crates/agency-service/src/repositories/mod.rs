//! In-memory resource repositories.
//!
//! Process-lifetime stores for actors and movies behind async read-write
//! locks. Database persistence is out of scope for this service; these
//! repositories are the seam where a database-backed implementation would
//! slot in.

pub mod actors;
pub mod movies;

pub use actors::ActorRepository;
pub use movies::MovieRepository;
