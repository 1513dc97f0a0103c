/*
ENSnano, a 3d graphical application for DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Insertions and skips, and the registry that owns them.

use ahash::AHashMap;
use std::collections::BTreeMap;

/// An insertion or a skip at a base index of a virtual helix.
///
/// A positive `length` means that `length` extra bases are inserted after `idx`. A length of
/// `-1` means that the base at `idx` is skipped. A length of 0 is never stored, such an insertion
/// is expressed by removing it from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insertion {
    idx: isize,
    length: isize,
}

impl Insertion {
    /// Create a new insertion. Any negative length is turned into a skip.
    pub fn new(idx: isize, length: isize) -> Self {
        Self {
            idx,
            length: Self::normalized_length(length),
        }
    }

    pub fn idx(&self) -> isize {
        self.idx
    }

    pub fn length(&self) -> isize {
        self.length
    }

    pub fn is_skip(&self) -> bool {
        self.length < 0
    }

    pub(crate) fn set_length(&mut self, length: isize) {
        self.length = Self::normalized_length(length)
    }

    pub(crate) fn normalized_length(length: isize) -> isize {
        if length < 0 {
            -1
        } else {
            length
        }
    }
}

/// The insertion registry of a part.
///
/// Insertions are shared by all the strands of a virtual helix: a strand does not own its
/// insertions, it reads the ones whose index lies in its interval.
#[derive(Debug, Clone, Default)]
pub struct Insertions(AHashMap<usize, BTreeMap<isize, Insertion>>);

impl Insertions {
    /// The insertions of helix `helix`, sorted by increasing index.
    pub fn on_helix(&self, helix: usize) -> Option<&BTreeMap<isize, Insertion>> {
        self.0.get(&helix)
    }

    pub fn get(&self, helix: usize, idx: isize) -> Option<&Insertion> {
        self.0.get(&helix).and_then(|map| map.get(&idx))
    }

    pub fn contains(&self, helix: usize, idx: isize) -> bool {
        self.get(helix, idx).is_some()
    }

    /// Iterate over the insertions of `helix` whose index is in `[low, high]`, by increasing
    /// index.
    pub fn between(
        &self,
        helix: usize,
        low: isize,
        high: isize,
    ) -> impl Iterator<Item = &Insertion> + '_ {
        self.0
            .get(&helix)
            .filter(|_| low <= high)
            .into_iter()
            .flat_map(move |map| map.range(low..=high).map(|(_, insertion)| insertion))
    }

    /// The sum of the lengths of the insertions of `helix` whose index is in `[low, high]`.
    pub fn length_between(&self, helix: usize, low: isize, high: isize) -> isize {
        self.between(helix, low, high).map(|i| i.length()).sum()
    }

    pub fn len(&self) -> usize {
        self.0.values().map(|map| map.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, helix: usize, insertion: Insertion) -> Option<Insertion> {
        self.0
            .entry(helix)
            .or_insert_with(Default::default)
            .insert(insertion.idx(), insertion)
    }

    pub(crate) fn remove(&mut self, helix: usize, idx: isize) -> Option<Insertion> {
        let map = self.0.get_mut(&helix)?;
        let ret = map.remove(&idx);
        if map.is_empty() {
            self.0.remove(&helix);
        }
        ret
    }

    pub(crate) fn get_mut(&mut self, helix: usize, idx: isize) -> Option<&mut Insertion> {
        self.0.get_mut(&helix).and_then(|map| map.get_mut(&idx))
    }
}
