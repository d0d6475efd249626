//! Drops duplicate records of the same physical storm from a collection.
//!
//! Named storms are grouped by (genesis basin, name, season) and only the
//! longest record of each group survives. Two genuinely distinct storms that
//! share all three are merged by elimination; this is a known limitation.
//! Unnamed storms are too numerous for that key, so they only collapse when
//! their full identity, including the quantized first position, matches.

use crate::types::basin::Basin;
use crate::types::storm::{Storm, StormIdentity};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DuplicateKey {
    Named {
        basin: Option<Basin>,
        name: String,
        season: Option<i32>,
    },
    Unnamed(StormIdentity),
}

impl DuplicateKey {
    fn of(storm: &Storm) -> Self {
        if storm.is_named() {
            DuplicateKey::Named {
                basin: storm.basin(),
                name: storm.name.clone(),
                season: storm.season(),
            }
        } else {
            DuplicateKey::Unnamed(storm.identity())
        }
    }
}

/// Outcome of [`resolve_duplicates`]. Both lists keep collection order.
#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    pub kept: Vec<Storm>,
    pub discarded: Vec<Storm>,
}

/// Keeps the record with the most observations in each duplicate group.
/// On equal counts the record seen first wins.
pub fn resolve_duplicates(storms: Vec<Storm>) -> Deduplicated {
    let mut best: HashMap<DuplicateKey, usize> = HashMap::new();
    for (i, storm) in storms.iter().enumerate() {
        match best.entry(DuplicateKey::of(storm)) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(mut slot) => {
                if storm.len() > storms[*slot.get()].len() {
                    slot.insert(i);
                }
            }
        }
    }
    let winners: HashSet<usize> = best.into_values().collect();

    let mut result = Deduplicated::default();
    for (i, storm) in storms.into_iter().enumerate() {
        if winners.contains(&i) {
            result.kept.push(storm);
        } else {
            debug!("Discarding duplicate record {} ({})", storm.id, storm.name);
            result.discarded.push(storm);
        }
    }
    result
}
