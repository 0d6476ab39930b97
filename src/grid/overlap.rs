//! Overlap validation.
//!
//! Events are partitioned by [`OwnerKey`]; two events of the same owner may
//! not share a slot. Ranges are closed, so touching at a slot counts.

use std::collections::{BTreeSet, HashMap};

use crate::models::event::{Event, EventId, OwnerKey};
use crate::models::slot::SlotRange;

/// A proposed placement checked before any create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapCandidate {
    pub owner: OwnerKey,
    pub range: SlotRange,
    /// The event being moved or resized, ignored during the check.
    pub exclude: Option<EventId>,
}

impl OverlapCandidate {
    pub fn new(owner: OwnerKey, range: SlotRange) -> Self {
        Self {
            owner,
            range,
            exclude: None,
        }
    }

    pub fn excluding(mut self, id: EventId) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// True as soon as one same-owner event intersects the candidate.
pub fn is_overlapping<'a, I>(candidate: &OverlapCandidate, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Event>,
{
    existing.into_iter().any(|event| {
        Some(event.id) != candidate.exclude
            && event.shares_owner(&candidate.owner)
            && event.range.intersects(&candidate.range)
    })
}

/// Ids of every event that intersects another event of the same owner.
///
/// Such pairs can only arrive from outside the engine (other sessions
/// writing to the same store), the renderer flags them.
pub fn overlapping_ids(events: &[Event]) -> BTreeSet<EventId> {
    let mut by_owner: HashMap<&OwnerKey, Vec<&Event>> = HashMap::new();
    for event in events {
        by_owner.entry(&event.owner).or_default().push(event);
    }

    let mut conflicting = BTreeSet::new();
    for group in by_owner.values_mut() {
        group.sort_by_key(|event| (event.range.start(), event.range.end()));
        // Sweep keeping the event reaching furthest right.
        let mut reach: Option<&Event> = None;
        for event in group.iter() {
            if let Some(previous) = reach {
                if event.range.start() <= previous.range.end() {
                    conflicting.insert(previous.id);
                    conflicting.insert(event.id);
                }
                if event.range.end() > previous.range.end() {
                    reach = Some(event);
                }
            } else {
                reach = Some(event);
            }
        }
    }
    conflicting
}
