//! Ring Registry
//!
//! A single-owner circular registry of stations. Stations live in a slab
//! arena and link to each other by arena slot; a station-number index gives
//! O(1) resolution of command references. All mutation goes through the
//! four neighbor commands, so link surgery never escapes this module.

use std::collections::HashMap;

use slab::Slab;

use crate::error::{Error, Result};
use crate::ring::station::{Station, StationId};

// =============================================================================
// Constants
// =============================================================================

/// Smallest ring the registry will hold. Close commands that would shrink
/// the ring below this size are refused without mutating.
pub const MIN_RING_SIZE: usize = 2;

// =============================================================================
// Registry Statistics
// =============================================================================

/// Counters for registry mutations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Stations spliced in by build commands
    pub stations_built: u64,
    /// Stations removed by close commands
    pub stations_closed: u64,
    /// Close commands refused at the minimum ring size
    pub closes_refused: u64,
}

// =============================================================================
// Ring Registry
// =============================================================================

/// Circular station registry with O(1) keyed neighbor commands
#[derive(Debug, Clone)]
pub struct RingRegistry {
    /// Arena holding every live station
    stations: Slab<Station>,
    /// Station number to arena slot
    index: HashMap<StationId, usize>,
    /// Mutation counters
    stats: RegistryStats,
}

impl RingRegistry {
    /// Build a ring from distinct station numbers, linked in the given
    /// order with the last station linking back to the first.
    pub fn new(numbers: &[u32]) -> Result<Self> {
        if numbers.len() < MIN_RING_SIZE {
            return Err(Error::TooFewStations {
                min: MIN_RING_SIZE,
                count: numbers.len(),
            });
        }

        let mut registry = Self {
            stations: Slab::with_capacity(numbers.len()),
            index: HashMap::with_capacity(numbers.len()),
            stats: RegistryStats::default(),
        };

        let mut slots = Vec::with_capacity(numbers.len());
        for &number in numbers {
            let id = StationId::new(number);
            if registry.index.contains_key(&id) {
                return Err(Error::StationExists { station: id });
            }
            let entry = registry.stations.vacant_entry();
            let slot = entry.key();
            entry.insert(Station::new(id, slot));
            registry.index.insert(id, slot);
            slots.push(slot);
        }

        // Close the ring
        let count = slots.len();
        for (i, &slot) in slots.iter().enumerate() {
            let station = &mut registry.stations[slot];
            station.next = slots[(i + 1) % count];
            station.prev = slots[(i + count - 1) % count];
        }

        Ok(registry)
    }

    /// Number of live stations
    #[inline]
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Check if a station number is live
    pub fn contains(&self, station: impl Into<StationId>) -> bool {
        self.index.contains_key(&station.into())
    }

    /// Station immediately after `station` in ring order
    pub fn next_of(&self, station: impl Into<StationId>) -> Result<StationId> {
        let slot = self.slot_of(station.into())?;
        Ok(self.stations[self.stations[slot].next].id)
    }

    /// Station immediately before `station` in ring order
    pub fn prev_of(&self, station: impl Into<StationId>) -> Result<StationId> {
        let slot = self.slot_of(station.into())?;
        Ok(self.stations[self.stations[slot].prev].id)
    }

    /// Splice `station` in immediately after `at`.
    ///
    /// Returns the station that was `at`'s next neighbor before the splice.
    pub fn build_next(
        &mut self,
        at: impl Into<StationId>,
        station: impl Into<StationId>,
    ) -> Result<StationId> {
        let at = at.into();
        let station = station.into();

        let at_slot = self.slot_of(at)?;
        if self.index.contains_key(&station) {
            return Err(Error::StationExists { station });
        }

        let next_slot = self.stations[at_slot].next;
        let displaced = self.stations[next_slot].id;

        let entry = self.stations.vacant_entry();
        let slot = entry.key();
        entry.insert(Station {
            id: station,
            next: next_slot,
            prev: at_slot,
        });

        self.stations[at_slot].next = slot;
        self.stations[next_slot].prev = slot;
        self.index.insert(station, slot);
        self.stats.stations_built += 1;

        Ok(displaced)
    }

    /// Splice `station` in immediately before `at`.
    ///
    /// Returns the station that was `at`'s previous neighbor before the
    /// splice.
    pub fn build_prev(
        &mut self,
        at: impl Into<StationId>,
        station: impl Into<StationId>,
    ) -> Result<StationId> {
        let at = at.into();
        let station = station.into();

        let at_slot = self.slot_of(at)?;
        if self.index.contains_key(&station) {
            return Err(Error::StationExists { station });
        }

        let prev_slot = self.stations[at_slot].prev;
        let displaced = self.stations[prev_slot].id;

        let entry = self.stations.vacant_entry();
        let slot = entry.key();
        entry.insert(Station {
            id: station,
            next: at_slot,
            prev: prev_slot,
        });

        self.stations[prev_slot].next = slot;
        self.stations[at_slot].prev = slot;
        self.index.insert(station, slot);
        self.stats.stations_built += 1;

        Ok(displaced)
    }

    /// Close the station immediately after `at`, returning its number.
    ///
    /// Returns `None` without mutating when the ring is already at its
    /// minimum size.
    pub fn close_next(&mut self, at: impl Into<StationId>) -> Result<Option<StationId>> {
        let at_slot = self.slot_of(at.into())?;

        if self.stations.len() <= MIN_RING_SIZE {
            self.stats.closes_refused += 1;
            return Ok(None);
        }

        let victim_slot = self.stations[at_slot].next;
        let after_slot = self.stations[victim_slot].next;

        self.stations[at_slot].next = after_slot;
        self.stations[after_slot].prev = at_slot;

        let closed = self.stations.remove(victim_slot);
        self.index.remove(&closed.id);
        self.stats.stations_closed += 1;

        Ok(Some(closed.id))
    }

    /// Close the station immediately before `at`, returning its number.
    ///
    /// Returns `None` without mutating when the ring is already at its
    /// minimum size.
    pub fn close_prev(&mut self, at: impl Into<StationId>) -> Result<Option<StationId>> {
        let at_slot = self.slot_of(at.into())?;

        if self.stations.len() <= MIN_RING_SIZE {
            self.stats.closes_refused += 1;
            return Ok(None);
        }

        let victim_slot = self.stations[at_slot].prev;
        let before_slot = self.stations[victim_slot].prev;

        self.stations[before_slot].next = at_slot;
        self.stations[at_slot].prev = before_slot;

        let closed = self.stations.remove(victim_slot);
        self.index.remove(&closed.id);
        self.stats.stations_closed += 1;

        Ok(Some(closed.id))
    }

    /// Iterate station numbers in ring order starting at `start`, visiting
    /// every live station exactly once.
    pub fn iter_from(&self, start: impl Into<StationId>) -> Result<RingIter<'_>> {
        let slot = self.slot_of(start.into())?;
        Ok(RingIter {
            stations: &self.stations,
            cursor: slot,
            remaining: self.stations.len(),
        })
    }

    /// Snapshot of the mutation counters
    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    /// Resolve a station number to its arena slot
    #[inline]
    fn slot_of(&self, station: StationId) -> Result<usize> {
        self.index
            .get(&station)
            .copied()
            .ok_or(Error::StationNotFound { station })
    }
}

// =============================================================================
// Ring Iterator
// =============================================================================

/// Iterator over station numbers in ring order
#[derive(Debug)]
pub struct RingIter<'a> {
    stations: &'a Slab<Station>,
    cursor: usize,
    remaining: usize,
}

impl Iterator for RingIter<'_> {
    type Item = StationId;

    fn next(&mut self) -> Option<StationId> {
        if self.remaining == 0 {
            return None;
        }
        let station = &self.stations[self.cursor];
        self.cursor = station.next;
        self.remaining -= 1;
        Some(station.id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RingIter<'_> {}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// One command step; the reference station is picked by position among
    /// the stations live at that point.
    #[derive(Debug, Clone, Copy)]
    enum Step {
        BuildNext(usize),
        BuildPrev(usize),
        CloseNext(usize),
        ClosePrev(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        (0u8..4, any::<usize>()).prop_map(|(op, pick)| match op {
            0 => Step::BuildNext(pick),
            1 => Step::BuildPrev(pick),
            2 => Step::CloseNext(pick),
            _ => Step::ClosePrev(pick),
        })
    }

    /// Walk the whole ring both ways and cross-check it against the set of
    /// stations expected to be live.
    fn check_ring(registry: &RingRegistry, live: &[StationId]) {
        assert!(registry.station_count() >= MIN_RING_SIZE);
        assert_eq!(registry.station_count(), live.len());

        let start = live[0];
        let forward: Vec<StationId> = registry.iter_from(start).unwrap().collect();
        assert_eq!(forward.len(), live.len());

        let reachable: HashSet<StationId> = forward.iter().copied().collect();
        assert_eq!(reachable.len(), forward.len());
        for &station in live {
            assert!(reachable.contains(&station));
            assert!(registry.contains(station));
        }

        // next and prev stay mutually inverse around the whole ring
        for &station in &forward {
            let next = registry.next_of(station).unwrap();
            let prev = registry.prev_of(station).unwrap();
            assert_eq!(registry.prev_of(next).unwrap(), station);
            assert_eq!(registry.next_of(prev).unwrap(), station);
        }

        // walking prev visits the forward order reversed
        let mut backward = Vec::with_capacity(forward.len());
        let mut cursor = start;
        for _ in 0..forward.len() {
            backward.push(cursor);
            cursor = registry.prev_of(cursor).unwrap();
        }
        assert_eq!(cursor, start);
        let mut expected = forward.clone();
        expected[1..].reverse();
        assert_eq!(backward, expected);
    }

    proptest! {
        /// The ring stays circular, at least two stations large, and in
        /// lockstep with the lookup index under arbitrary command sequences.
        #[test]
        fn ring_stays_circular_under_commands(
            initial in 2usize..12,
            steps in proptest::collection::vec(step(), 0..64),
        ) {
            let numbers: Vec<u32> = (1..=initial as u32).collect();
            let mut registry = RingRegistry::new(&numbers).unwrap();
            let mut live: Vec<StationId> =
                numbers.iter().copied().map(StationId::new).collect();
            let mut next_number = 1000u32;
            let mut built = 0u64;
            let mut closed = 0u64;
            let mut refused = 0u64;

            check_ring(&registry, &live);

            for step in steps {
                match step {
                    Step::BuildNext(pick) => {
                        let at = live[pick % live.len()];
                        let station = StationId::new(next_number);
                        next_number += 1;
                        let displaced = registry.build_next(at, station).unwrap();
                        prop_assert_eq!(registry.next_of(at).unwrap(), station);
                        prop_assert_eq!(registry.next_of(station).unwrap(), displaced);
                        prop_assert_eq!(registry.prev_of(station).unwrap(), at);
                        live.push(station);
                        built += 1;
                    }
                    Step::BuildPrev(pick) => {
                        let at = live[pick % live.len()];
                        let station = StationId::new(next_number);
                        next_number += 1;
                        let displaced = registry.build_prev(at, station).unwrap();
                        prop_assert_eq!(registry.prev_of(at).unwrap(), station);
                        prop_assert_eq!(registry.prev_of(station).unwrap(), displaced);
                        prop_assert_eq!(registry.next_of(station).unwrap(), at);
                        live.push(station);
                        built += 1;
                    }
                    Step::CloseNext(pick) => {
                        let at = live[pick % live.len()];
                        let before = registry.station_count();
                        match registry.close_next(at).unwrap() {
                            Some(victim) => {
                                prop_assert!(before > MIN_RING_SIZE);
                                prop_assert!(!registry.contains(victim));
                                live.retain(|&s| s != victim);
                                closed += 1;
                            }
                            None => {
                                prop_assert_eq!(before, MIN_RING_SIZE);
                                prop_assert_eq!(registry.station_count(), MIN_RING_SIZE);
                                refused += 1;
                            }
                        }
                    }
                    Step::ClosePrev(pick) => {
                        let at = live[pick % live.len()];
                        let before = registry.station_count();
                        match registry.close_prev(at).unwrap() {
                            Some(victim) => {
                                prop_assert!(before > MIN_RING_SIZE);
                                prop_assert!(!registry.contains(victim));
                                live.retain(|&s| s != victim);
                                closed += 1;
                            }
                            None => {
                                prop_assert_eq!(before, MIN_RING_SIZE);
                                prop_assert_eq!(registry.station_count(), MIN_RING_SIZE);
                                refused += 1;
                            }
                        }
                    }
                }
                check_ring(&registry, &live);
            }

            let stats = registry.stats();
            prop_assert_eq!(stats.stations_built, built);
            prop_assert_eq!(stats.stations_closed, closed);
            prop_assert_eq!(stats.closes_refused, refused);
            prop_assert_eq!(
                registry.station_count() as u64,
                initial as u64 + built - closed
            );
        }
    }
}
