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

use super::{is_drawn_5to3, ErrOperation, Insertion, Insertions, OligoId, StrandId, StrandType};
use std::collections::BTreeMap;
mod formating;
pub(crate) mod sequence;

/// The arena of the strands of a part, that maps strand identifiers to strands.
///
/// Connections between strands are expressed with identifiers, so the arena is the only owner of
/// the strands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strands(pub(crate) BTreeMap<StrandId, Strand>);

impl Strands {
    pub fn get(&self, id: &StrandId) -> Option<&Strand> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strand> {
        self.0.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = StrandId> + '_ {
        self.0.keys().cloned()
    }

    pub fn contains(&self, id: &StrandId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An identifier that is not used by any strand, `nth` positions after the largest one.
    pub(crate) fn fresh_id(&self, nth: usize) -> StrandId {
        let next = self.0.keys().next_back().map(|id| id.0 + 1).unwrap_or(0);
        StrandId(next + nth)
    }

    /// The number of crossovers, that is connections that do not link adjacent bases of the same
    /// helix.
    pub fn nb_xovers(&self) -> usize {
        self.iter()
            .filter(|s| {
                s.strand3p
                    .and_then(|id| self.get(&id))
                    .map(|next| !s.is_adjacent_to(next))
                    .unwrap_or(false)
            })
            .count()
    }
}

/// One of the two index ends of a strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Low,
    High,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// One of the two physical ends of a strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extremity {
    Prime5,
    Prime3,
}

impl Extremity {
    pub fn opposite(self) -> Self {
        match self {
            Self::Prime5 => Self::Prime3,
            Self::Prime3 => Self::Prime5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Prime5 => "5'",
            Self::Prime3 => "3'",
        }
    }
}

/// An auxiliary marker attached to a base of a strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub idx: isize,
    pub label: String,
}

impl Annotation {
    pub fn new<S: Into<String>>(idx: isize, label: S) -> Self {
        Self {
            idx,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Decorator,
    Modifier,
}

/// A contiguous interval of bases of one strand set.
///
/// A strand knows its 5' and 3' neighbours by their identifiers. Which of its `low`/`high` ends is
/// the 5' end is decided once, at creation, from the direction of the strand set that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strand {
    pub(crate) id: StrandId,
    pub(crate) helix: usize,
    pub(crate) strand_type: StrandType,
    pub(crate) low: isize,
    pub(crate) high: isize,
    drawn_5to3: bool,
    pub(crate) strand5p: Option<StrandId>,
    pub(crate) strand3p: Option<StrandId>,
    pub(crate) oligo: Option<OligoId>,
    /// The sequence of the strand, from 5' to 3'. It may be shorter or longer than the total
    /// length of the strand, in which case it is padded with blanks or truncated when read.
    pub(crate) sequence: Option<String>,
    pub(crate) decorators: BTreeMap<isize, Annotation>,
    pub(crate) modifiers: BTreeMap<isize, Annotation>,
}

impl Strand {
    pub(crate) fn new(
        id: StrandId,
        helix: usize,
        strand_type: StrandType,
        low: isize,
        high: isize,
    ) -> Self {
        Self {
            id,
            helix,
            strand_type,
            low,
            high,
            drawn_5to3: is_drawn_5to3(helix, strand_type),
            strand5p: None,
            strand3p: None,
            oligo: None,
            sequence: None,
            decorators: Default::default(),
            modifiers: Default::default(),
        }
    }

    pub fn id(&self) -> StrandId {
        self.id
    }

    pub fn helix(&self) -> usize {
        self.helix
    }

    pub fn strand_type(&self) -> StrandType {
        self.strand_type
    }

    pub fn idxs(&self) -> (isize, isize) {
        (self.low, self.high)
    }

    pub fn low_idx(&self) -> isize {
        self.low
    }

    pub fn high_idx(&self) -> isize {
        self.high
    }

    /// Number of base indices covered by the strand.
    pub fn length(&self) -> usize {
        (self.high - self.low + 1) as usize
    }

    /// Number of nucleotides of the strand, taking insertions and skips into account.
    pub fn total_length(&self, insertions: &Insertions) -> usize {
        let total = self.length() as isize
            + self.insertion_length_between(insertions, self.low, self.high);
        total.max(0) as usize
    }

    pub fn is_drawn_5to3(&self) -> bool {
        self.drawn_5to3
    }

    pub fn contains(&self, idx: isize) -> bool {
        self.low <= idx && idx <= self.high
    }

    pub fn extremity_of(&self, side: Side) -> Extremity {
        match (side, self.drawn_5to3) {
            (Side::Low, true) | (Side::High, false) => Extremity::Prime5,
            (Side::Low, false) | (Side::High, true) => Extremity::Prime3,
        }
    }

    pub fn side_of(&self, extremity: Extremity) -> Side {
        match (extremity, self.drawn_5to3) {
            (Extremity::Prime5, true) | (Extremity::Prime3, false) => Side::Low,
            (Extremity::Prime5, false) | (Extremity::Prime3, true) => Side::High,
        }
    }

    pub fn idx_of(&self, side: Side) -> isize {
        match side {
            Side::Low => self.low,
            Side::High => self.high,
        }
    }

    pub fn end_idx(&self, extremity: Extremity) -> isize {
        self.idx_of(self.side_of(extremity))
    }

    pub fn idx5p(&self) -> isize {
        self.end_idx(Extremity::Prime5)
    }

    pub fn idx3p(&self) -> isize {
        self.end_idx(Extremity::Prime3)
    }

    /// The side of the strand that ends at `idx`, if any. The low side is returned for single
    /// base strands.
    pub fn endpoint_side(&self, idx: isize) -> Option<Side> {
        if idx == self.low {
            Some(Side::Low)
        } else if idx == self.high {
            Some(Side::High)
        } else {
            None
        }
    }

    pub fn connection(&self, extremity: Extremity) -> Option<StrandId> {
        match extremity {
            Extremity::Prime5 => self.strand5p,
            Extremity::Prime3 => self.strand3p,
        }
    }

    pub fn connection5p(&self) -> Option<StrandId> {
        self.strand5p
    }

    pub fn connection3p(&self) -> Option<StrandId> {
        self.strand3p
    }

    pub fn connection_at(&self, side: Side) -> Option<StrandId> {
        self.connection(self.extremity_of(side))
    }

    pub fn connection_low(&self) -> Option<StrandId> {
        self.connection_at(Side::Low)
    }

    pub fn connection_high(&self) -> Option<StrandId> {
        self.connection_at(Side::High)
    }

    pub(crate) fn set_connection(&mut self, extremity: Extremity, strand: Option<StrandId>) {
        match extremity {
            Extremity::Prime5 => self.strand5p = strand,
            Extremity::Prime3 => self.strand3p = strand,
        }
    }

    /// Replace every connection to `old` by a connection to `new`.
    pub(crate) fn replace_connection(&mut self, old: StrandId, new: Option<StrandId>) {
        if self.strand5p == Some(old) {
            self.strand5p = new;
        }
        if self.strand3p == Some(old) {
            self.strand3p = new;
        }
    }

    /// Return true if the 3' end of `self` and the 5' end of `next` are consecutive bases of the
    /// same strand set.
    pub fn is_adjacent_to(&self, next: &Strand) -> bool {
        if self.helix != next.helix || self.strand_type != next.strand_type {
            return false;
        }
        if self.drawn_5to3 {
            next.idx5p() == self.idx3p() + 1
        } else {
            next.idx5p() == self.idx3p() - 1
        }
    }

    /// A crossover is necessarily at an endpoint of a strand. Both ends of a single base strand
    /// are at `idx`.
    pub fn has_xover_at(&self, idx: isize) -> bool {
        let low = idx == self.low && self.connection_low().is_some();
        let high = idx == self.high && self.connection_high().is_some();
        low || high
    }

    /// The insertions of the helix whose index is in `[low_bound, high_bound]`, by increasing
    /// index. The bounds default to the interval of the strand.
    pub fn insertions_on_strand<'a>(
        &self,
        insertions: &'a Insertions,
        low_bound: Option<isize>,
        high_bound: Option<isize>,
    ) -> impl Iterator<Item = &'a Insertion> + 'a {
        insertions.between(
            self.helix,
            low_bound.unwrap_or(self.low),
            high_bound.unwrap_or(self.high),
        )
    }

    pub fn insertion_length_between(
        &self,
        insertions: &Insertions,
        low: isize,
        high: isize,
    ) -> isize {
        insertions.length_between(self.helix, low, high)
    }

    pub fn has_insertions(&self, insertions: &Insertions) -> bool {
        self.insertions_on_strand(insertions, None, None).next().is_some()
    }

    /// The indices where crossover-adjacent markers may be displayed. The two last bases before
    /// a connected end are excluded.
    pub fn pre_decorator_idx_list(&self) -> Vec<isize> {
        let mut ret: Vec<isize> = (self.low..=self.high).collect();
        if self.connection_low().is_some() {
            ret.retain(|i| *i != self.low && *i != self.low + 1);
        }
        if self.connection_high().is_some() {
            ret.retain(|i| *i != self.high && *i != self.high - 1);
        }
        ret
    }

    /// The bounds within which the end of the strand at `idx` can be moved.
    ///
    /// `neighbors` are the strands of the same strand set that are immediately below and above
    /// this one, `part_bounds` are the minimum and maximum base indices of the part.
    pub fn resize_bounds(
        &self,
        idx: isize,
        neighbors: (Option<&Strand>, Option<&Strand>),
        part_bounds: (isize, isize),
    ) -> Result<(isize, isize), ErrOperation> {
        let side = self.endpoint_side(idx).ok_or(ErrOperation::NotAnEndpoint {
            strand: self.id,
            idx,
        })?;
        Ok(self.side_resize_bounds(side, neighbors, part_bounds))
    }

    pub fn side_resize_bounds(
        &self,
        side: Side,
        neighbors: (Option<&Strand>, Option<&Strand>),
        part_bounds: (isize, isize),
    ) -> (isize, isize) {
        match side {
            Side::Low => {
                let low = neighbors.0.map(|s| s.high + 1).unwrap_or(part_bounds.0);
                (low, self.high - 1)
            }
            Side::High => {
                let high = neighbors.1.map(|s| s.low - 1).unwrap_or(part_bounds.1);
                (self.low + 1, high)
            }
        }
    }

    pub fn oligo(&self) -> Option<OligoId> {
        self.oligo
    }

    pub fn annotations(&self, kind: AnnotationKind) -> &BTreeMap<isize, Annotation> {
        match kind {
            AnnotationKind::Decorator => &self.decorators,
            AnnotationKind::Modifier => &self.modifiers,
        }
    }

    pub(crate) fn annotations_mut(
        &mut self,
        kind: AnnotationKind,
    ) -> &mut BTreeMap<isize, Annotation> {
        match kind {
            AnnotationKind::Decorator => &mut self.decorators,
            AnnotationKind::Modifier => &mut self.modifiers,
        }
    }

    pub fn decorators(&self) -> &BTreeMap<isize, Annotation> {
        &self.decorators
    }

    pub fn modifiers(&self) -> &BTreeMap<isize, Annotation> {
        &self.modifiers
    }
}
