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
//! The strands of one direction of a virtual helix.

use super::strands::sequence::BLANK;
use super::{
    is_drawn_5to3, ErrOperation, Extremity, Insertions, Strand, StrandId, StrandType, Strands,
};
use std::collections::BTreeMap;

/// An ordered collection of non-overlapping strands, indexed by their low index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrandSet {
    helix: usize,
    strand_type: StrandType,
    drawn_5to3: bool,
    strands: BTreeMap<isize, StrandId>,
}

impl StrandSet {
    pub fn new(helix: usize, strand_type: StrandType) -> Self {
        Self {
            helix,
            strand_type,
            drawn_5to3: is_drawn_5to3(helix, strand_type),
            strands: BTreeMap::new(),
        }
    }

    pub fn helix(&self) -> usize {
        self.helix
    }

    pub fn strand_type(&self) -> StrandType {
        self.strand_type
    }

    pub fn is_drawn_5to3(&self) -> bool {
        self.drawn_5to3
    }

    /// The identifiers of the strands, by increasing index.
    pub fn ids(&self) -> impl Iterator<Item = StrandId> + '_ {
        self.strands.values().cloned()
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }

    pub(crate) fn insert(&mut self, strand: &Strand) {
        self.strands.insert(strand.low, strand.id);
    }

    pub(crate) fn remove(&mut self, strand: &Strand) {
        if self.strands.get(&strand.low) == Some(&strand.id) {
            self.strands.remove(&strand.low);
        }
    }

    /// The strands that are immediately below and above `strand`.
    pub fn get_neighbors(&self, strand: &Strand) -> (Option<StrandId>, Option<StrandId>) {
        let low = self
            .strands
            .range(..strand.low)
            .next_back()
            .map(|(_, id)| *id);
        let high = self
            .strands
            .range(strand.low + 1..)
            .next()
            .map(|(_, id)| *id);
        (low, high)
    }

    /// The strand that covers base `idx`, if any.
    pub fn strand_at(&self, idx: isize, strands: &Strands) -> Option<StrandId> {
        let (_, id) = self.strands.range(..=idx).next_back()?;
        strands.get(id).filter(|s| s.high >= idx).map(|s| s.id)
    }

    /// The strands that intersect `[low, high]`, by increasing index.
    pub fn overlapping(&self, low: isize, high: isize, strands: &Strands) -> Vec<StrandId> {
        if low > high {
            return vec![];
        }
        let mut ret = Vec::new();
        if let Some(id) = self.strand_at(low, strands) {
            ret.push(id);
        }
        for (_, id) in self.strands.range(low..=high) {
            if !ret.contains(id) {
                ret.push(*id);
            }
        }
        ret
    }

    /// Return true if `[low, high]` does not intersect any strand that is not in `ignore`.
    pub fn can_install(
        &self,
        low: isize,
        high: isize,
        ignore: &[StrandId],
        strands: &Strands,
    ) -> bool {
        self.overlapping(low, high, strands)
            .iter()
            .all(|id| ignore.contains(id))
    }

    /// Break `strand` between `idx` and `idx + 1`.
    ///
    /// Return the `[low, idx]` half and the `[idx + 1, high]` half, with identifiers `ids`. The two
    /// halves are not connected to each other, the other connections of `strand` are kept by the
    /// half that owns the corresponding end. Annotations are copied in both halves.
    pub fn split_strand(
        &self,
        strand: &Strand,
        idx: isize,
        ids: (StrandId, StrandId),
        insertions: &Insertions,
    ) -> Result<(Strand, Strand), ErrOperation> {
        if idx < strand.low || idx >= strand.high {
            return Err(ErrOperation::SplitOutOfRange {
                strand: strand.id,
                idx,
            });
        }
        let mut low_half = strand.clone();
        low_half.id = ids.0;
        low_half.high = idx;
        let mut high_half = strand.clone();
        high_half.id = ids.1;
        high_half.low = idx + 1;

        let (mut five, mut three) = if self.drawn_5to3 {
            (low_half, high_half)
        } else {
            (high_half, low_half)
        };
        five.strand3p = None;
        three.strand5p = None;
        // a strand whose 3' end was connected to its own 5' end
        if five.strand5p == Some(strand.id) {
            five.strand5p = Some(three.id);
        }
        if three.strand3p == Some(strand.id) {
            three.strand3p = Some(five.id);
        }

        if strand.sequence.is_some() {
            let seq = strand.visible_sequence(insertions);
            let (_, rest) = five.set_sequence(Some(&seq), insertions);
            three.set_sequence(rest, insertions);
            five.sequence = five.sequence.take().and_then(non_blank);
            three.sequence = three.sequence.take().and_then(non_blank);
        }

        if self.drawn_5to3 {
            Ok((five, three))
        } else {
            Ok((three, five))
        }
    }

    /// Join `survivor` and `other`, which must be adjacent strands of this strand set.
    ///
    /// The result has the identifier of `survivor`. It keeps the connections of the outer ends of
    /// the two strands, the connections of the inner ends are dropped.
    pub fn merge_strands(
        &self,
        survivor: &Strand,
        other: &Strand,
        insertions: &Insertions,
    ) -> Strand {
        let (low_strand, high_strand) = if survivor.low < other.low {
            (survivor, other)
        } else {
            (other, survivor)
        };
        let (five, three) = if self.drawn_5to3 {
            (low_strand, high_strand)
        } else {
            (high_strand, low_strand)
        };

        let mut ret = survivor.clone();
        ret.low = low_strand.low;
        ret.high = high_strand.high;
        let rename = |c: Option<StrandId>| {
            if c == Some(five.id) || c == Some(three.id) {
                Some(survivor.id)
            } else {
                c
            }
        };
        ret.set_connection(Extremity::Prime5, rename(five.strand5p));
        ret.set_connection(Extremity::Prime3, rename(three.strand3p));

        ret.sequence = if five.sequence.is_some() || three.sequence.is_some() {
            let mut seq = five.visible_sequence(insertions);
            seq.push_str(&three.visible_sequence(insertions));
            non_blank(seq)
        } else {
            None
        };

        for (idx, decorator) in other.decorators.iter() {
            ret.decorators.entry(*idx).or_insert_with(|| decorator.clone());
        }
        for (idx, modifier) in other.modifiers.iter() {
            ret.modifiers.entry(*idx).or_insert_with(|| modifier.clone());
        }
        ret
    }
}

fn non_blank(seq: String) -> Option<String> {
    if seq.chars().all(|c| c == BLANK) {
        None
    } else {
        Some(seq)
    }
}
