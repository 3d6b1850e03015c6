//! Selection Engine - Group bookkeeping and the bridge to cards.
//!
//! The engine manages the core data structures:
//! - Registry: known card values, selection set, toggle policy
//! - Bridge: shared group handle, snapshots, registration guards
//!
//! # Architecture
//!
//! Cards are NOT wired to each other. Each card holds a bridge handle and
//! reads the group through it:
//!
//! ```text
//! CheckCardGroup ── owns ──▶ GroupBridge ── RefCell ──▶ SelectionRegistry
//!                                 ▲   └── Signal<u64> revision
//!        CheckCard ── clones ─────┘
//! ```
//!
//! Only the bridge mutates the registry; cards submit register, cancel and
//! toggle intents and read published snapshots.

pub mod bridge;
pub mod registry;

pub use bridge::{GroupBridge, GroupSnapshot, Registration};
pub use registry::{SelectionRegistry, SelectionSet};
