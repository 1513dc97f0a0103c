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
//! The part is the container of the virtual helices and of the strands laid on them.

use super::{
    design_operations::Operation, ErrOperation, Extremity, Insertions, Oligo, OligoId,
    PartNotification, PartObserver, PartParameters, Reversible, Strand, StrandId, StrandSet,
    StrandType, Strands,
};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// A virtual helix of a part, with its two strand sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualHelix {
    num: usize,
    row: isize,
    col: isize,
    scaffold: StrandSet,
    staple: StrandSet,
}

impl VirtualHelix {
    fn new(num: usize, row: isize, col: isize) -> Self {
        Self {
            num,
            row,
            col,
            scaffold: StrandSet::new(num, StrandType::Scaffold),
            staple: StrandSet::new(num, StrandType::Staple),
        }
    }

    pub fn number(&self) -> usize {
        self.num
    }

    /// The position of the helix on the lattice.
    pub fn coord(&self) -> (isize, isize) {
        (self.row, self.col)
    }

    pub fn strand_set(&self, strand_type: StrandType) -> &StrandSet {
        match strand_type {
            StrandType::Scaffold => &self.scaffold,
            StrandType::Staple => &self.staple,
        }
    }

    fn strand_set_mut(&mut self, strand_type: StrandType) -> &mut StrandSet {
        match strand_type {
            StrandType::Scaffold => &mut self.scaffold,
            StrandType::Staple => &mut self.staple,
        }
    }
}

pub struct Part {
    parameters: PartParameters,
    helices: BTreeMap<usize, VirtualHelix>,
    strands: Strands,
    insertions: Insertions,
    oligos: BTreeMap<OligoId, Oligo>,
    observers: Vec<Box<dyn PartObserver>>,
}

impl std::fmt::Debug for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("parameters", &self.parameters)
            .field("helices", &self.helices)
            .field("strands", &self.strands)
            .field("insertions", &self.insertions)
            .field("oligos", &self.oligos)
            .finish()
    }
}

impl Default for Part {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl Part {
    pub fn new(parameters: PartParameters) -> Self {
        Self {
            parameters,
            helices: BTreeMap::new(),
            strands: Default::default(),
            insertions: Default::default(),
            oligos: BTreeMap::new(),
            observers: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &PartParameters {
        &self.parameters
    }

    pub fn min_base_idx(&self) -> isize {
        self.parameters.min_base_idx()
    }

    pub fn max_base_idx(&self) -> isize {
        self.parameters.max_base_idx()
    }

    pub fn insertions(&self) -> &Insertions {
        &self.insertions
    }

    /// Register an observer that will receive all the notifications of the part.
    pub fn subscribe(&mut self, observer: Box<dyn PartObserver>) {
        self.observers.push(observer)
    }

    pub fn add_helix(&mut self, num: usize, row: isize, col: isize) -> Result<(), ErrOperation> {
        if self.helices.contains_key(&num) {
            return Err(ErrOperation::HelixAlreadyExists(num));
        }
        log::debug!("New helix {} at ({}, {})", num, row, col);
        self.helices.insert(num, VirtualHelix::new(num, row, col));
        Ok(())
    }

    pub fn helix(&self, num: usize) -> Option<&VirtualHelix> {
        self.helices.get(&num)
    }

    pub fn helices(&self) -> impl Iterator<Item = &VirtualHelix> {
        self.helices.values()
    }

    pub fn strands(&self) -> &Strands {
        &self.strands
    }

    pub fn strand(&self, id: StrandId) -> Option<&Strand> {
        self.strands.get(&id)
    }

    pub fn get_strand(&self, id: StrandId) -> Result<&Strand, ErrOperation> {
        self.strand(id).ok_or(ErrOperation::StrandDoesNotExist(id))
    }

    pub fn strand_set(
        &self,
        helix: usize,
        strand_type: StrandType,
    ) -> Result<&StrandSet, ErrOperation> {
        self.helix(helix)
            .map(|h| h.strand_set(strand_type))
            .ok_or(ErrOperation::HelixDoesNotExist(helix))
    }

    /// The strands immediately below and above strand `id` in its strand set.
    pub fn get_neighbors(
        &self,
        id: StrandId,
    ) -> Result<(Option<&Strand>, Option<&Strand>), ErrOperation> {
        let strand = self.get_strand(id)?;
        let set = self.strand_set(strand.helix, strand.strand_type)?;
        let (low, high) = set.get_neighbors(strand);
        Ok((
            low.and_then(|id| self.strand(id)),
            high.and_then(|id| self.strand(id)),
        ))
    }

    /// The bounds within which the end of strand `id` at `idx` can be moved.
    pub fn get_resize_bounds(
        &self,
        id: StrandId,
        idx: isize,
    ) -> Result<(isize, isize), ErrOperation> {
        let strand = self.get_strand(id)?;
        let neighbors = self.get_neighbors(id)?;
        strand.resize_bounds(idx, neighbors, (self.min_base_idx(), self.max_base_idx()))
    }

    /// The strand of type `strand_type` that covers base `idx` of `helix`.
    pub fn strand_at(&self, helix: usize, strand_type: StrandType, idx: isize) -> Option<&Strand> {
        let set = self.strand_set(helix, strand_type).ok()?;
        set.strand_at(idx, &self.strands)
            .and_then(|id| self.strand(id))
    }

    /// Return true if a strand of `helix`, other than `ignore`, covers base `idx`.
    pub(crate) fn is_covered(&self, helix: usize, idx: isize, ignore: StrandId) -> bool {
        [StrandType::Scaffold, StrandType::Staple]
            .iter()
            .filter_map(|t| self.strand_at(helix, *t, idx))
            .any(|s| s.id != ignore)
    }

    pub fn total_length(&self, id: StrandId) -> Result<usize, ErrOperation> {
        Ok(self.get_strand(id)?.total_length(&self.insertions))
    }

    /// Iterate over the strands that follow strand `id` from 5' to 3', starting with `id`.
    pub fn strands_3p_from(&self, id: StrandId) -> Strands3p<'_> {
        Strands3p {
            part: self,
            origin: id,
            next: Some(id),
            steps: 0,
            reached_origin: false,
        }
    }

    /// The 5'-most strand of the chain of `id`. For a loop, `id` itself is returned.
    pub fn strand_5p_most(&self, id: StrandId) -> StrandId {
        let mut current = id;
        let mut steps = 0;
        while let Some(prev) = self.strand(current).and_then(|s| s.strand5p) {
            if prev == id || steps > self.strands.len() {
                return id;
            }
            current = prev;
            steps += 1;
        }
        current
    }

    pub fn oligos(&self) -> impl Iterator<Item = &Oligo> {
        self.oligos.values()
    }

    pub fn oligo(&self, id: OligoId) -> Option<&Oligo> {
        self.oligos.get(&id)
    }

    pub fn oligo_of(&self, strand: StrandId) -> Option<&Oligo> {
        self.strand(strand)
            .and_then(|s| s.oligo)
            .and_then(|id| self.oligo(id))
    }

    /// The 5' to 3' sequence of an oligo, padded with blanks where no sequence is set.
    pub fn oligo_sequence(&self, id: OligoId) -> Option<String> {
        let oligo = self.oligo(id)?;
        let mut ret = String::with_capacity(oligo.length);
        for s_id in oligo.strands.iter() {
            let strand = self.strand(*s_id)?;
            ret.push_str(&strand.visible_sequence(&self.insertions));
        }
        Some(ret)
    }

    pub fn nb_xovers(&self) -> usize {
        self.strands.nb_xovers()
    }

    /// Apply the commands of `operation` without recording them.
    pub fn execute<T>(&mut self, operation: Operation<T>) -> T {
        log::trace!("execute {}", operation.label);
        for c in operation.commands.iter() {
            c.redo(self)
        }
        operation.output
    }

    pub(crate) fn notify(&self, notification: PartNotification) {
        for observer in self.observers.iter() {
            observer.notify(&notification)
        }
    }

    pub(crate) fn insertions_mut(&mut self) -> &mut Insertions {
        &mut self.insertions
    }

    pub(crate) fn strand_mut(&mut self, id: StrandId) -> Option<&mut Strand> {
        self.strands.0.get_mut(&id)
    }

    pub(crate) fn insert_strand(&mut self, strand: Strand) {
        if let Some(helix) = self.helices.get_mut(&strand.helix) {
            helix.strand_set_mut(strand.strand_type).insert(&strand);
        } else {
            log::error!("Inserting strand {} in unknown helix {}", strand.id, strand.helix);
        }
        self.strands.0.insert(strand.id, strand);
    }

    pub(crate) fn take_strand(&mut self, id: StrandId) -> Option<Strand> {
        let strand = self.strands.0.remove(&id)?;
        if let Some(helix) = self.helices.get_mut(&strand.helix) {
            helix.strand_set_mut(strand.strand_type).remove(&strand);
        }
        Some(strand)
    }

    /// Set the interval of a strand. Return the helix of the strand.
    pub(crate) fn set_idxs(&mut self, id: StrandId, idxs: (isize, isize)) -> Option<usize> {
        let mut strand = self.take_strand(id)?;
        strand.low = idxs.0;
        strand.high = idxs.1;
        let helix = strand.helix;
        self.insert_strand(strand);
        Some(helix)
    }

    pub(crate) fn set_oligo_color(&mut self, id: OligoId, color: u32) -> bool {
        if let Some(oligo) = self.oligos.get_mut(&id) {
            oligo.color = color;
            true
        } else {
            false
        }
    }

    /// Recompute the oligos of the part.
    ///
    /// An oligo takes the color given in `colors` for its first listed strand. Otherwise it keeps
    /// the color of the previous oligo of its first strand. The strands whose oligo changed are
    /// notified.
    pub(crate) fn refresh_oligos(&mut self, colors: &[(StrandId, u32)]) {
        let mut previous: AHashMap<StrandId, OligoId> = AHashMap::new();
        for oligo in self.oligos.values() {
            for s in oligo.strands.iter() {
                previous.insert(*s, oligo.id);
            }
        }

        let mut oligos = BTreeMap::new();
        let mut assigned: AHashMap<StrandId, OligoId> = AHashMap::new();
        let starts: Vec<StrandId> = self
            .strands
            .iter()
            .filter(|s| s.strand5p.is_none())
            .map(|s| s.id)
            .chain(self.strands.ids())
            .collect();
        for start in starts {
            if assigned.contains_key(&start) {
                continue;
            }
            let id = OligoId::from(start);
            let mut chain = self.strands_3p_from(start);
            let mut strands = Vec::new();
            let mut length = 0;
            for s in &mut chain {
                if assigned.contains_key(&s.id) {
                    break;
                }
                assigned.insert(s.id, id);
                strands.push(s.id);
                length += s.total_length(&self.insertions);
            }
            let is_loop = chain.reached_origin();
            let given = strands
                .iter()
                .find_map(|s| colors.iter().find(|(id, _)| id == s).map(|(_, c)| *c));
            let color = given
                .or_else(|| {
                    strands
                        .iter()
                        .filter_map(|s| previous.get(s))
                        .filter_map(|o| self.oligos.get(o))
                        .map(|o| o.color)
                        .next()
                })
                .unwrap_or_else(|| self.default_color(start));
            oligos.insert(
                id,
                Oligo {
                    id,
                    strand5p: start,
                    strands,
                    is_loop,
                    length,
                    color,
                },
            );
        }
        self.oligos = oligos;

        let mut changed = Vec::new();
        for (s_id, o_id) in assigned.iter() {
            if let Some(strand) = self.strands.0.get_mut(s_id) {
                strand.oligo = Some(*o_id);
            }
            if previous.get(s_id) != Some(o_id) {
                changed.push(*s_id);
            }
        }
        changed.sort();
        for strand in changed {
            self.notify(PartNotification::StrandHasNewOligo { strand });
        }
    }

    fn default_color(&self, strand: StrandId) -> u32 {
        match self.strand(strand).map(|s| s.strand_type) {
            Some(StrandType::Scaffold) => self.parameters.scaffold_color,
            _ => self.parameters.staple_color,
        }
    }

    /// A short description of the content of the part.
    pub fn formated_summary(&self) -> String {
        use std::fmt::Write;
        let mut ret = String::new();
        writeln!(&mut ret, "Parameters:").unwrap_or_default();
        ret.push_str(&self.parameters.formated_string());
        for helix in self.helices.values() {
            let scaffold = helix.strand_set(StrandType::Scaffold);
            let staple = helix.strand_set(StrandType::Staple);
            writeln!(
                &mut ret,
                "H{} ({}, {}): {} scaffold strands, {} staple strands",
                helix.num,
                helix.row,
                helix.col,
                scaffold.len(),
                staple.len()
            )
            .unwrap_or_default();
            for s_id in scaffold.ids().chain(staple.ids()) {
                if let Some(s) = self.strand(s_id) {
                    writeln!(&mut ret, "  {}", s.formated_connections()).unwrap_or_default();
                }
            }
        }
        writeln!(&mut ret, "#Oligos: {}", self.oligos.len()).unwrap_or_default();
        writeln!(&mut ret, "#Crossovers: {}", self.nb_xovers()).unwrap_or_default();
        ret
    }
}

/// An iterator over a chain of strands from 5' to 3'.
///
/// The iteration stops at the end of the chain, or when it comes back to its first strand. In
/// the latter case `reached_origin` returns true once the iteration is over.
pub struct Strands3p<'a> {
    part: &'a Part,
    origin: StrandId,
    next: Option<StrandId>,
    steps: usize,
    reached_origin: bool,
}

impl<'a> Strands3p<'a> {
    pub fn reached_origin(&self) -> bool {
        self.reached_origin
    }
}

impl<'a> Iterator for Strands3p<'a> {
    type Item = &'a Strand;

    fn next(&mut self) -> Option<&'a Strand> {
        let id = self.next.take()?;
        if self.steps > 0 && id == self.origin {
            self.reached_origin = true;
            return None;
        }
        if self.steps > self.part.strands.len() {
            log::error!("Chain from {} does not come back to its origin", self.origin);
            return None;
        }
        self.steps += 1;
        let strand = self.part.strand(id)?;
        self.next = strand.connection(Extremity::Prime3);
        Some(strand)
    }
}
