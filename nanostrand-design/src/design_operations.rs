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
//! This modules defines the operations that can be performed on a part.
//!
//! An operation checks its preconditions on the current state of the part and returns the
//! `Command`s that perform it, without applying them. The commands can then be executed on the
//! part directly (`Part::execute`) or recorded on an undo stack (`Document`).
//!
//! Operations that have nothing to do (adding an insertion where there already is one, merging
//! a strand that has no adjacent neighbour...) are not errors, they return an operation without
//! commands whose output is `false`.

use super::commands::{SequenceChange, StrandSwap};
use super::{
    Annotation, AnnotationKind, Command, Extremity, Insertion, OligoId, Part, Side, Strand,
    StrandId, StrandType, TransitionLabel,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// The commands that perform an operation, and the result of the operation.
#[derive(Debug, Clone)]
pub struct Operation<T> {
    pub label: TransitionLabel,
    pub commands: Vec<Command>,
    pub output: T,
}

impl<T> Operation<T> {
    fn new<L: Into<TransitionLabel>>(label: L, commands: Vec<Command>, output: T) -> Self {
        Self {
            label: label.into(),
            commands,
            output,
        }
    }

    /// Return true if the operation has no effect.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Operation<bool> {
    fn nothing<L: Into<TransitionLabel>>(label: L) -> Self {
        Self::new(label, vec![], false)
    }
}

/// An error that occured when trying to apply an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrOperation {
    #[error("strand {0} does not exist")]
    StrandDoesNotExist(StrandId),
    #[error("helix {0} does not exist")]
    HelixDoesNotExist(usize),
    #[error("helix {0} already exists")]
    HelixAlreadyExists(usize),
    #[error("[{low}, {high}] is not a valid interval")]
    InvalidInterval { low: isize, high: isize },
    #[error("base {idx} is outside of the part bounds [{min}, {max}]")]
    OutOfPartBounds { idx: isize, min: isize, max: isize },
    #[error("[{low}, {high}] overlaps an existing {strand_type:?} strand on helix {helix}")]
    Overlap {
        helix: usize,
        strand_type: StrandType,
        low: isize,
        high: isize,
    },
    #[error("{idx} is not an end of strand {strand}")]
    NotAnEndpoint { strand: StrandId, idx: isize },
    #[error("cannot resize strand {strand} to {requested:?}, allowed bounds are {bounds:?}")]
    ResizeOutOfBounds {
        strand: StrandId,
        requested: (isize, isize),
        bounds: (isize, isize),
    },
    #[error("cannot split strand {strand} at {idx}")]
    SplitOutOfRange { strand: StrandId, idx: isize },
    #[error("base {idx} is not on strand {strand}")]
    IndexOutOfStrand { strand: StrandId, idx: isize },
    #[error("the {prime} end of strand {strand} is already connected")]
    EndAlreadyConnected { strand: StrandId, prime: &'static str },
    #[error("strands {0} and {1} are not of the same type")]
    IncompatibleStrandTypes(StrandId, StrandId),
    #[error("the 3' end of strand {0} is not connected")]
    NoConnection(StrandId),
    #[error("oligo {0} does not exist")]
    OligoDoesNotExist(OligoId),
}

/// Create a strand covering `[low, high]` on `helix`.
pub fn create_strand(
    part: &Part,
    helix: usize,
    strand_type: StrandType,
    low: isize,
    high: isize,
) -> Result<Operation<StrandId>, ErrOperation> {
    let set = part.strand_set(helix, strand_type)?;
    if low > high {
        return Err(ErrOperation::InvalidInterval { low, high });
    }
    let (min, max) = (part.min_base_idx(), part.max_base_idx());
    for idx in [low, high].iter().cloned() {
        if idx < min || idx > max {
            return Err(ErrOperation::OutOfPartBounds { idx, min, max });
        }
    }
    if !set.can_install(low, high, &[], part.strands()) {
        return Err(ErrOperation::Overlap {
            helix,
            strand_type,
            low,
            high,
        });
    }
    let strand = Strand::new(part.strands().fresh_id(0), helix, strand_type, low, high);
    let id = strand.id;
    Ok(Operation::new(
        "Create strand",
        vec![Command::CreateStrand { strand }],
        id,
    ))
}

/// Remove a strand. The insertions that are not covered by another strand anymore are removed
/// as well.
pub fn remove_strand(part: &Part, id: StrandId) -> Result<Operation<()>, ErrOperation> {
    let strand = part.get_strand(id)?;
    let mut commands = orphaned_insertions(part, strand, strand.low, strand.high);
    let swap = swap_with_partners(part, vec![strand.clone()], vec![]);
    commands.push(Command::RemoveStrand { strand: id, swap });
    Ok(Operation::new("Remove strand", commands, ()))
}

/// Move the ends of strand `id` to `new_idxs`.
///
/// Each end that moves must stay within its resize bounds. The insertions of the bases that are
/// left uncovered are removed.
pub fn resize(
    part: &Part,
    id: StrandId,
    new_idxs: (isize, isize),
) -> Result<Operation<()>, ErrOperation> {
    let strand = part.get_strand(id)?;
    let (low, high) = new_idxs;
    if low > high {
        return Err(ErrOperation::InvalidInterval { low, high });
    }
    let neighbors = part.get_neighbors(id)?;
    let part_bounds = (part.min_base_idx(), part.max_base_idx());
    for (side, requested) in [(Side::Low, low), (Side::High, high)].iter().cloned() {
        if requested != strand.idx_of(side) {
            let bounds = strand.side_resize_bounds(side, neighbors, part_bounds);
            if requested < bounds.0 || requested > bounds.1 {
                return Err(ErrOperation::ResizeOutOfBounds {
                    strand: id,
                    requested: new_idxs,
                    bounds,
                });
            }
        }
    }
    if new_idxs == strand.idxs() {
        return Ok(Operation::new("Resize strand", vec![], ()));
    }

    let mut commands = Vec::new();
    if low > strand.low {
        commands.extend(orphaned_insertions(part, strand, strand.low, low - 1));
    }
    if high < strand.high {
        commands.extend(orphaned_insertions(part, strand, high + 1, strand.high));
    }
    commands.push(Command::Resize {
        strand: id,
        old: strand.idxs(),
        new: new_idxs,
    });
    Ok(Operation::new("Resize strand", commands, ()))
}

/// Break strand `id` between `idx` and `idx + 1`.
///
/// Return the identifiers of the `[low, idx]` and `[idx + 1, high]` halves.
pub fn split(
    part: &Part,
    id: StrandId,
    idx: isize,
) -> Result<Operation<(StrandId, StrandId)>, ErrOperation> {
    let strand = part.get_strand(id)?;
    let set = part.strand_set(strand.helix, strand.strand_type)?;
    let ids = (part.strands().fresh_id(0), part.strands().fresh_id(1));
    let (low_half, high_half) = set.split_strand(strand, idx, ids, part.insertions())?;
    let mut commands = vec![Command::Split {
        strand: id,
        idx,
        swap: swap_with_partners(
            part,
            vec![strand.clone()],
            vec![low_half.clone(), high_half.clone()],
        ),
    }];
    commands.extend(remove_commands_after_split(&low_half));
    commands.extend(remove_commands_after_split(&high_half));
    Ok(Operation::new("Split strand", commands, ids))
}

/// The commands that remove the annotations of a split half that are outside of its interval.
fn remove_commands_after_split(half: &Strand) -> Vec<Command> {
    let mut ret = Vec::new();
    for kind in [AnnotationKind::Decorator, AnnotationKind::Modifier].iter() {
        for annotation in half.annotations(*kind).values() {
            if !half.contains(annotation.idx) {
                ret.push(Command::RemoveAnnotation {
                    strand: half.id,
                    kind: *kind,
                    annotation: annotation.clone(),
                });
            }
        }
    }
    ret
}

/// Merge strand `id` with the strand of its strand set that ends next to its end `idx`.
///
/// The merged strand keeps the identifier `id`. Return `false` if there is no such strand.
pub fn merge(part: &Part, id: StrandId, idx: isize) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    let sides = match strand.endpoint_side(idx) {
        None => return Err(ErrOperation::NotAnEndpoint { strand: id, idx }),
        Some(_) if strand.low == strand.high => vec![Side::Low, Side::High],
        Some(side) => vec![side],
    };
    let neighbors = part.get_neighbors(id)?;
    let candidate = sides.into_iter().find_map(|side| match side {
        Side::Low => neighbors
            .0
            .filter(|n| n.high + 1 == strand.low)
            .map(|n| (side, n)),
        Side::High => neighbors
            .1
            .filter(|n| n.low - 1 == strand.high)
            .map(|n| (side, n)),
    });
    let (side, other) = if let Some(candidate) = candidate {
        candidate
    } else {
        log::debug!("No strand to merge {} with at {}", id, idx);
        return Ok(Operation::nothing("Merge strands"));
    };

    let inner_ends = [
        (strand, strand.extremity_of(side)),
        (other, other.extremity_of(side.opposite())),
    ];
    for (s, extremity) in inner_ends.iter() {
        if let Some(partner) = s.connection(*extremity) {
            if partner != strand.id && partner != other.id {
                log::warn!(
                    "Merging {} and {} severs the connection of the {} end of {} to {}",
                    strand.id,
                    other.id,
                    extremity.name(),
                    s.id,
                    partner
                );
            }
        }
    }

    let set = part.strand_set(strand.helix, strand.strand_type)?;
    let merged = set.merge_strands(strand, other, part.insertions());
    let swap = swap_with_partners(part, vec![strand.clone(), other.clone()], vec![merged]);
    Ok(Operation::new(
        "Merge strands",
        vec![Command::Merge {
            strand: id,
            idx,
            swap,
        }],
        true,
    ))
}

/// Add an insertion of `length` bases after base `idx` of strand `id`. A negative length is a
/// skip.
pub fn add_insertion(
    part: &Part,
    id: StrandId,
    idx: isize,
    length: isize,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    if !strand.contains(idx) {
        log::debug!("Base {} is not on {}", idx, id);
        return Ok(Operation::nothing("Add insertion"));
    }
    if length == 0 {
        log::debug!("Ignoring insertion of length 0 at {} on {}", idx, id);
        return Ok(Operation::nothing("Add insertion"));
    }
    if part.insertions().contains(strand.helix, idx) {
        log::debug!("There is already an insertion at {} on {}", idx, id);
        return Ok(Operation::nothing("Add insertion"));
    }
    Ok(Operation::new(
        "Add insertion",
        vec![Command::AddInsertion {
            strand: id,
            insertion: Insertion::new(idx, length),
        }],
        true,
    ))
}

pub fn remove_insertion(
    part: &Part,
    id: StrandId,
    idx: isize,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    if !strand.contains(idx) {
        log::debug!("Base {} is not on {}", idx, id);
        return Ok(Operation::nothing("Remove insertion"));
    }
    if let Some(insertion) = part.insertions().get(strand.helix, idx) {
        Ok(Operation::new(
            "Remove insertion",
            vec![Command::RemoveInsertion {
                strand: id,
                insertion: *insertion,
            }],
            true,
        ))
    } else {
        log::debug!("No insertion to remove at {} on {}", idx, id);
        Ok(Operation::nothing("Remove insertion"))
    }
}

/// Change the length of the insertion at `idx`. A length of 0 removes the insertion.
pub fn change_insertion(
    part: &Part,
    id: StrandId,
    idx: isize,
    new_length: isize,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    if !strand.contains(idx) {
        log::debug!("Base {} is not on {}", idx, id);
        return Ok(Operation::nothing("Change insertion"));
    }
    let insertion = if let Some(insertion) = part.insertions().get(strand.helix, idx) {
        *insertion
    } else {
        log::debug!("No insertion to change at {} on {}", idx, id);
        return Ok(Operation::nothing("Change insertion"));
    };
    if new_length == 0 {
        return remove_insertion(part, id, idx);
    }
    let new_length = Insertion::normalized_length(new_length);
    if new_length == insertion.length() {
        return Ok(Operation::nothing("Change insertion"));
    }
    Ok(Operation::new(
        "Change insertion",
        vec![Command::ChangeInsertion {
            strand: id,
            idx,
            old_length: insertion.length(),
            new_length,
        }],
        true,
    ))
}

/// Attach a decorator or a modifier to a base of strand `id`. Nothing is done if the base
/// already has an annotation of the same kind.
pub fn add_annotation(
    part: &Part,
    id: StrandId,
    kind: AnnotationKind,
    annotation: Annotation,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    if !strand.contains(annotation.idx) {
        return Err(ErrOperation::IndexOutOfStrand {
            strand: id,
            idx: annotation.idx,
        });
    }
    if strand.annotations(kind).contains_key(&annotation.idx) {
        log::debug!("There is already a {:?} at {} on {}", kind, annotation.idx, id);
        return Ok(Operation::nothing("Add annotation"));
    }
    Ok(Operation::new(
        "Add annotation",
        vec![Command::AddAnnotation {
            strand: id,
            kind,
            annotation,
        }],
        true,
    ))
}

pub fn remove_annotation(
    part: &Part,
    id: StrandId,
    kind: AnnotationKind,
    idx: isize,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    if let Some(annotation) = strand.annotations(kind).get(&idx) {
        Ok(Operation::new(
            "Remove annotation",
            vec![Command::RemoveAnnotation {
                strand: id,
                kind,
                annotation: annotation.clone(),
            }],
            true,
        ))
    } else {
        Ok(Operation::nothing("Remove annotation"))
    }
}

pub fn change_annotation(
    part: &Part,
    id: StrandId,
    kind: AnnotationKind,
    annotation: Annotation,
) -> Result<Operation<bool>, ErrOperation> {
    let strand = part.get_strand(id)?;
    match strand.annotations(kind).get(&annotation.idx) {
        Some(old) if *old != annotation => Ok(Operation::new(
            "Change annotation",
            vec![Command::ChangeAnnotation {
                strand: id,
                kind,
                old: old.clone(),
                new: annotation,
            }],
            true,
        )),
        _ => Ok(Operation::nothing("Change annotation")),
    }
}

/// Connect the 3' end of `strand3p` to the 5' end of `strand5p`.
pub fn install_xover(
    part: &Part,
    strand3p: StrandId,
    strand5p: StrandId,
) -> Result<Operation<()>, ErrOperation> {
    let from = part.get_strand(strand3p)?;
    let to = part.get_strand(strand5p)?;
    if from.strand_type != to.strand_type {
        return Err(ErrOperation::IncompatibleStrandTypes(strand3p, strand5p));
    }
    for (s, extremity) in [(from, Extremity::Prime3), (to, Extremity::Prime5)].iter() {
        if s.connection(*extremity).is_some() {
            return Err(ErrOperation::EndAlreadyConnected {
                strand: s.id,
                prime: extremity.name(),
            });
        }
    }
    Ok(Operation::new(
        "Install crossover",
        vec![Command::InstallXover { strand3p, strand5p }],
        (),
    ))
}

/// Disconnect the 3' end of `strand3p`.
pub fn remove_xover(part: &Part, strand3p: StrandId) -> Result<Operation<()>, ErrOperation> {
    let from = part.get_strand(strand3p)?;
    let strand5p = from.strand3p.ok_or(ErrOperation::NoConnection(strand3p))?;
    Ok(Operation::new(
        "Remove crossover",
        vec![Command::RemoveXover { strand3p, strand5p }],
        (),
    ))
}

/// Apply `text` to the oligo of strand `id`, starting from its 5' end, and set the complementary
/// sequence on the paired strands. If `text` is `None` the sequences are cleared.
pub fn apply_sequence(
    part: &Part,
    id: StrandId,
    text: Option<&str>,
) -> Result<Operation<()>, ErrOperation> {
    part.get_strand(id)?;
    let insertions = part.insertions();
    let start = part.strand_5p_most(id);
    let mut work: BTreeMap<StrandId, Strand> = BTreeMap::new();
    let mut rest = text;
    let chain: Vec<StrandId> = part.strands_3p_from(start).map(|s| s.id).collect();
    for s_id in chain {
        let mut strand = if let Some(strand) = work.remove(&s_id) {
            strand
        } else {
            part.get_strand(s_id)?.clone()
        };
        let (used, unused) = strand.set_sequence(rest, insertions);
        rest = unused;
        let set = part.strand_set(strand.helix, strand.strand_type.complement())?;
        for partner_id in set.overlapping(strand.low, strand.high, part.strands()) {
            let mut partner = if let Some(partner) = work.remove(&partner_id) {
                partner
            } else {
                part.get_strand(partner_id)?.clone()
            };
            partner.set_complement_sequence(used, &strand, insertions);
            work.insert(partner_id, partner);
        }
        work.insert(s_id, strand);
    }

    let changes: Vec<SequenceChange> = work
        .into_iter()
        .filter_map(|(s_id, strand)| {
            let old = part.strand(s_id)?.sequence.clone();
            if old != strand.sequence {
                Some(SequenceChange {
                    strand: s_id,
                    old,
                    new: strand.sequence,
                })
            } else {
                None
            }
        })
        .collect();
    let commands = if changes.is_empty() {
        vec![]
    } else {
        vec![Command::SetSequences { changes }]
    };
    Ok(Operation::new("Set sequence", commands, ()))
}

pub fn set_oligo_color(
    part: &Part,
    oligo: OligoId,
    color: u32,
) -> Result<Operation<bool>, ErrOperation> {
    let old = part
        .oligo(oligo)
        .ok_or(ErrOperation::OligoDoesNotExist(oligo))?
        .color;
    if old == color {
        return Ok(Operation::nothing("Set oligo color"));
    }
    Ok(Operation::new(
        "Set oligo color",
        vec![Command::SetOligoColor {
            oligo,
            old,
            new: color,
        }],
        true,
    ))
}

/// The commands that remove the insertions of `[low, high]` on the helix of `strand` that are
/// not covered by any other strand.
fn orphaned_insertions(part: &Part, strand: &Strand, low: isize, high: isize) -> Vec<Command> {
    strand
        .insertions_on_strand(part.insertions(), Some(low), Some(high))
        .filter(|i| !part.is_covered(strand.helix, i.idx(), strand.id))
        .map(|insertion| Command::RemoveInsertion {
            strand: strand.id,
            insertion: *insertion,
        })
        .collect()
}

/// The swap that replaces `removed` by `added`, together with the strands connected to them.
///
/// Partners that pointed to a removed strand are disconnected, unless an added strand is
/// connected to them, in which case they are connected to the added strand.
fn swap_with_partners(part: &Part, removed: Vec<Strand>, added: Vec<Strand>) -> StrandSwap {
    let touched: BTreeSet<StrandId> = removed.iter().chain(added.iter()).map(|s| s.id).collect();
    let mut partners: BTreeMap<StrandId, Strand> = BTreeMap::new();
    let extremities = [Extremity::Prime5, Extremity::Prime3];

    for r in removed.iter() {
        for extremity in extremities.iter() {
            let partner_id = match r.connection(*extremity) {
                Some(p) if !touched.contains(&p) => p,
                _ => continue,
            };
            if let Some(partner) = partner_entry(part, &mut partners, partner_id) {
                if partner.connection(extremity.opposite()) == Some(r.id) {
                    partner.set_connection(extremity.opposite(), None);
                }
            }
        }
    }
    for a in added.iter() {
        for extremity in extremities.iter() {
            let partner_id = match a.connection(*extremity) {
                Some(p) if !touched.contains(&p) => p,
                _ => continue,
            };
            if let Some(partner) = partner_entry(part, &mut partners, partner_id) {
                partner.set_connection(extremity.opposite(), Some(a.id));
            }
        }
    }

    let mut before = removed;
    let mut after = added;
    for (p_id, partner) in partners.into_iter() {
        if let Some(original) = part.strand(p_id) {
            if *original != partner {
                before.push(original.clone());
                after.push(partner);
            }
        }
    }
    let colors = before
        .iter()
        .filter_map(|s| Some((s.id, part.oligo_of(s.id)?.color)))
        .collect();
    StrandSwap {
        before,
        after,
        colors,
    }
}

fn partner_entry<'a>(
    part: &Part,
    partners: &'a mut BTreeMap<StrandId, Strand>,
    id: StrandId,
) -> Option<&'a mut Strand> {
    if !partners.contains_key(&id) {
        partners.insert(id, part.strand(id)?.clone());
    }
    partners.get_mut(&id)
}
