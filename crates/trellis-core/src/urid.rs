//! URID interning.
//!
//! A URID is a small integer standing for a URI string. Styles, themes and
//! widget identities are keyed by URIDs so lookups compare integers instead
//! of strings.
//!
//! Ids are minted monotonically and never deleted. [`Urid::UNKNOWN`] (zero)
//! is never handed out for a real URI.
//!
//! Two ways to intern:
//!
//! - an explicit [`UridRegistry`] owned by the caller
//! - the process-wide registry behind [`urid`] and [`uri`]
//!
//! ```
//! use trellis_core::urid::{uri, urid, Urid};
//!
//! let a = urid("urn:example:dial");
//! assert_eq!(a, urid("urn:example:dial"));
//! assert_ne!(a, Urid::UNKNOWN);
//! assert_eq!(uri(a), "urn:example:dial");
//! ```

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logging::targets;

/// An interned URI identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urid(u32);

impl Urid {
    /// The sentinel for "no URI".
    pub const UNKNOWN: Urid = Urid(0);

    /// The raw integer value.
    #[inline]
    pub fn as_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl fmt::Display for Urid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urid#{}", self.0)
    }
}

/// Bidirectional URI <-> URID table.
#[derive(Debug, Default)]
pub struct UridRegistry {
    by_uri: HashMap<String, Urid>,
    // Index `i` holds the URI of `Urid(i + 1)`.
    by_id: Vec<String>,
}

impl UridRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the URID for `uri`, minting a new one if needed.
    ///
    /// The empty string maps to [`Urid::UNKNOWN`].
    pub fn urid(&mut self, uri: &str) -> Urid {
        if uri.is_empty() {
            return Urid::UNKNOWN;
        }
        if let Some(&id) = self.by_uri.get(uri) {
            return id;
        }
        self.by_id.push(uri.to_owned());
        let id = Urid(self.by_id.len() as u32);
        self.by_uri.insert(uri.to_owned(), id);
        tracing::trace!(target: targets::URID, %id, uri, "minted urid");
        id
    }

    /// Look up an existing URID without minting.
    pub fn lookup(&self, uri: &str) -> Option<Urid> {
        self.by_uri.get(uri).copied()
    }

    /// The URI registered for `id`, or the empty string for unknown ids.
    pub fn uri(&self, id: Urid) -> &str {
        match id.0 {
            0 => "",
            n => self.by_id.get(n as usize - 1).map_or("", String::as_str),
        }
    }

    /// Number of minted URIDs.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

static GLOBAL_URIDS: RwLock<Option<UridRegistry>> = RwLock::new(None);

/// Intern `uri` in the process-wide registry.
pub fn urid(uri: &str) -> Urid {
    if let Some(id) = GLOBAL_URIDS.read().as_ref().and_then(|r| r.lookup(uri)) {
        return id;
    }
    GLOBAL_URIDS.write().get_or_insert_with(UridRegistry::new).urid(uri)
}

/// The URI behind a process-wide URID, or the empty string for unknown ids.
pub fn uri(id: Urid) -> String {
    GLOBAL_URIDS
        .read()
        .as_ref()
        .map(|r| r.uri(id).to_owned())
        .unwrap_or_default()
}
