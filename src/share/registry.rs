//! Offer bookkeeping: which numeric code maps to which staged file.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use std::path::PathBuf;

/// IANA dynamic port range. Offer codes double as listening ports, so
/// they are drawn from the slice of port space nothing else claims.
const CODE_RANGE_START: u16 = 49152;
const CODE_RANGE_END: u16 = 65535;

/// In-memory offer table. One instance is built at startup and shared
/// through the HTTP state; entries live until the process exits.
#[derive(Default)]
pub struct OfferRegistry {
    offers: DashMap<u16, PathBuf>,
}

impl OfferRegistry {
    pub fn new() -> Self {
        Self {
            offers: DashMap::new(),
        }
    }

    /// Issue a fresh code for `path`, redrawing while the code is taken.
    /// The entry API makes the free-check and the insert a single atomic
    /// step, so concurrent registers can never share a code. Liveness
    /// rests on the code space staying sparse relative to live offers.
    pub fn register(&self, path: PathBuf) -> u16 {
        loop {
            let code = rand::rng().random_range(CODE_RANGE_START..CODE_RANGE_END);
            match self.offers.entry(code) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(path);
                    return code;
                }
            }
        }
    }

    pub fn lookup(&self, code: u16) -> Option<PathBuf> {
        self.offers.get(&code).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
