//! Hash collections used throughout Trellis.
//!
//! Everything here is keyed by small integer identities, so the default
//! SipHash is replaced by AHash. Insertion-ordered variants are provided for
//! places where iteration order is observable (refresh coalescing).

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Insertion-ordered map hashed with AHash.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

/// Insertion-ordered set hashed with AHash.
pub type IndexSet<T> = indexmap::IndexSet<T, RandomState>;
