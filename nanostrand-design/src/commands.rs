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
//! Reversible commands that modify a `Part`.
//!
//! Each command carries enough of the old and new state to be reverted exactly. Commands do not
//! check their preconditions, they are built by the functions of `design_operations` which do.

use super::{
    AnnotationKind, Annotation, Insertion, OligoId, Part, PartNotification, Reversible, Strand,
    StrandId,
};
use std::collections::BTreeSet;

/// The strands that are replaced by a structural command.
///
/// Applying the swap removes the `before` strands from the part and inserts the `after` ones.
/// Reverting it does the opposite. A strand that appears on both sides is updated in place.
///
/// `colors` are the colors of the oligos of the `before` strands, they are given back to these
/// oligos when the swap is reverted.
#[derive(Debug, Clone, PartialEq)]
pub struct StrandSwap {
    pub before: Vec<Strand>,
    pub after: Vec<Strand>,
    pub colors: Vec<(StrandId, u32)>,
}

impl StrandSwap {
    fn replace(part: &mut Part, removed: &[Strand], added: &[Strand]) {
        for s in removed.iter() {
            part.take_strand(s.id);
        }
        for s in added.iter() {
            part.insert_strand(s.clone());
        }

        let mut helices = BTreeSet::new();
        for s in removed.iter() {
            helices.insert(s.helix);
            if !added.iter().any(|a| a.id == s.id) {
                part.notify(PartNotification::StrandRemoved { strand: s.id });
                part.notify(PartNotification::StrandDestroyed { strand: s.id });
            }
        }
        for s in added.iter() {
            helices.insert(s.helix);
            match removed.iter().find(|r| r.id == s.id) {
                None => part.notify(PartNotification::StrandAdded { strand: s.id }),
                Some(old) if old.idxs() != s.idxs() => {
                    part.notify(PartNotification::StrandResized {
                        strand: s.id,
                        idxs: s.idxs(),
                    })
                }
                Some(old) if old != s => {
                    part.notify(PartNotification::StrandUpdated { strand: s.id })
                }
                Some(_) => (),
            }
        }
        for helix in helices {
            part.notify(PartNotification::PartStrandChanged { helix });
        }
    }

    /// Apply the swap and return the colors that the oligos of the new strands inherit.
    fn redo(&self, part: &mut Part) -> Vec<(StrandId, u32)> {
        let colors = Self::inherited_colors(part, &self.before, &self.after);
        Self::replace(part, &self.before, &self.after);
        colors
    }

    fn undo(&self, part: &mut Part) -> Vec<(StrandId, u32)> {
        Self::replace(part, &self.after, &self.before);
        self.colors.clone()
    }

    /// A new strand that starts at the 5' end of a removed strand takes the color of its oligo.
    fn inherited_colors(
        part: &Part,
        removed: &[Strand],
        added: &[Strand],
    ) -> Vec<(StrandId, u32)> {
        added
            .iter()
            .filter(|a| removed.iter().all(|r| r.id != a.id))
            .filter_map(|a| {
                let origin = removed.iter().find(|r| {
                    r.helix == a.helix
                        && r.strand_type == a.strand_type
                        && r.idx5p() == a.idx5p()
                })?;
                let oligo = part.oligo_of(origin.id)?;
                Some((a.id, oligo.color))
            })
            .collect()
    }
}

/// The old and new sequences of a strand.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceChange {
    pub strand: StrandId,
    pub old: Option<String>,
    pub new: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the ends of a strand. The new bounds are not checked.
    Resize {
        strand: StrandId,
        old: (isize, isize),
        new: (isize, isize),
    },
    AddInsertion {
        strand: StrandId,
        insertion: Insertion,
    },
    RemoveInsertion {
        strand: StrandId,
        insertion: Insertion,
    },
    /// Change the length of an existing insertion, without replacing it.
    ChangeInsertion {
        strand: StrandId,
        idx: isize,
        old_length: isize,
        new_length: isize,
    },
    AddAnnotation {
        strand: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    },
    RemoveAnnotation {
        strand: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    },
    ChangeAnnotation {
        strand: StrandId,
        kind: AnnotationKind,
        old: Annotation,
        new: Annotation,
    },
    CreateStrand {
        strand: Strand,
    },
    RemoveStrand {
        strand: StrandId,
        swap: StrandSwap,
    },
    Split {
        strand: StrandId,
        idx: isize,
        swap: StrandSwap,
    },
    Merge {
        strand: StrandId,
        idx: isize,
        swap: StrandSwap,
    },
    /// Connect the 3' end of `strand3p` to the 5' end of `strand5p`.
    InstallXover {
        strand3p: StrandId,
        strand5p: StrandId,
    },
    RemoveXover {
        strand3p: StrandId,
        strand5p: StrandId,
    },
    SetSequences {
        changes: Vec<SequenceChange>,
    },
    SetOligoColor {
        oligo: OligoId,
        old: u32,
        new: u32,
    },
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "Resize strand",
            Self::AddInsertion { .. } => "Add insertion",
            Self::RemoveInsertion { .. } => "Remove insertion",
            Self::ChangeInsertion { .. } => "Change insertion",
            Self::AddAnnotation { .. } => "Add annotation",
            Self::RemoveAnnotation { .. } => "Remove annotation",
            Self::ChangeAnnotation { .. } => "Change annotation",
            Self::CreateStrand { .. } => "Create strand",
            Self::RemoveStrand { .. } => "Remove strand",
            Self::Split { .. } => "Split strand",
            Self::Merge { .. } => "Merge strands",
            Self::InstallXover { .. } => "Install crossover",
            Self::RemoveXover { .. } => "Remove crossover",
            Self::SetSequences { .. } => "Set sequences",
            Self::SetOligoColor { .. } => "Set oligo color",
        }
    }

    fn apply(&self, part: &mut Part, forward: bool) {
        log::trace!("{} {:?}", if forward { "redo" } else { "undo" }, self);
        let mut colors = Vec::new();
        match self {
            Self::Resize { strand, old, new } => {
                let idxs = if forward { *new } else { *old };
                if let Some(helix) = part.set_idxs(*strand, idxs) {
                    part.notify(PartNotification::StrandResized {
                        strand: *strand,
                        idxs,
                    });
                    part.notify(PartNotification::PartStrandChanged { helix });
                }
            }
            Self::AddInsertion { strand, insertion } => {
                if forward {
                    add_insertion(part, *strand, *insertion)
                } else {
                    remove_insertion(part, *strand, insertion.idx())
                }
            }
            Self::RemoveInsertion { strand, insertion } => {
                if forward {
                    remove_insertion(part, *strand, insertion.idx())
                } else {
                    add_insertion(part, *strand, *insertion)
                }
            }
            Self::ChangeInsertion {
                strand,
                idx,
                old_length,
                new_length,
            } => {
                let length = if forward { *new_length } else { *old_length };
                let changed = part.strand(*strand).map(|s| s.helix).and_then(|helix| {
                    let insertion = part.insertions_mut().get_mut(helix, *idx)?;
                    insertion.set_length(length);
                    Some(*insertion)
                });
                if let Some(insertion) = changed {
                    part.notify(PartNotification::InsertionChanged {
                        strand: *strand,
                        insertion,
                    });
                }
            }
            Self::AddAnnotation {
                strand,
                kind,
                annotation,
            } => {
                if forward {
                    add_annotation(part, *strand, *kind, annotation.clone())
                } else {
                    remove_annotation(part, *strand, *kind, annotation.idx)
                }
            }
            Self::RemoveAnnotation {
                strand,
                kind,
                annotation,
            } => {
                if forward {
                    remove_annotation(part, *strand, *kind, annotation.idx)
                } else {
                    add_annotation(part, *strand, *kind, annotation.clone())
                }
            }
            Self::ChangeAnnotation {
                strand,
                kind,
                old,
                new,
            } => {
                let annotation = if forward { new } else { old };
                if let Some(s) = part.strand_mut(*strand) {
                    s.annotations_mut(*kind)
                        .insert(annotation.idx, annotation.clone());
                    part.notify(PartNotification::annotation_changed(
                        *strand,
                        *kind,
                        annotation.clone(),
                    ));
                }
            }
            Self::CreateStrand { strand } => {
                let swap = StrandSwap {
                    before: vec![],
                    after: vec![strand.clone()],
                    colors: vec![],
                };
                if forward {
                    swap.redo(part);
                } else {
                    swap.undo(part);
                }
            }
            Self::RemoveStrand { swap, .. }
            | Self::Split { swap, .. }
            | Self::Merge { swap, .. } => {
                colors = if forward {
                    swap.redo(part)
                } else {
                    swap.undo(part)
                };
            }
            Self::InstallXover { strand3p, strand5p } => {
                if forward {
                    connect(part, *strand3p, *strand5p)
                } else {
                    disconnect(part, *strand3p, *strand5p)
                }
            }
            Self::RemoveXover { strand3p, strand5p } => {
                if forward {
                    disconnect(part, *strand3p, *strand5p)
                } else {
                    connect(part, *strand3p, *strand5p)
                }
            }
            Self::SetSequences { changes } => {
                for change in changes.iter() {
                    let seq = if forward { &change.new } else { &change.old };
                    if let Some(s) = part.strand_mut(change.strand) {
                        s.sequence = seq.clone();
                        part.notify(PartNotification::SequenceChanged {
                            strand: change.strand,
                        });
                    }
                }
            }
            Self::SetOligoColor { oligo, old, new } => {
                let color = if forward { *new } else { *old };
                if part.set_oligo_color(*oligo, color) {
                    part.notify(PartNotification::OligoColorChanged {
                        oligo: *oligo,
                        color,
                    });
                }
            }
        }
        if self.changes_topology() {
            part.refresh_oligos(&colors);
        }
    }

    /// Return true if the command can change the oligos of the part or their length.
    fn changes_topology(&self) -> bool {
        !matches!(
            self,
            Self::AddAnnotation { .. }
                | Self::RemoveAnnotation { .. }
                | Self::ChangeAnnotation { .. }
                | Self::SetSequences { .. }
                | Self::SetOligoColor { .. }
        )
    }
}

impl Reversible<Part> for Command {
    fn redo(&self, part: &mut Part) {
        self.apply(part, true)
    }

    fn undo(&self, part: &mut Part) {
        self.apply(part, false)
    }
}

fn add_insertion(part: &mut Part, strand: StrandId, insertion: Insertion) {
    if let Some(helix) = part.strand(strand).map(|s| s.helix) {
        part.insertions_mut().insert(helix, insertion);
        part.notify(PartNotification::InsertionAdded { strand, insertion });
    }
}

fn remove_insertion(part: &mut Part, strand: StrandId, idx: isize) {
    if let Some(helix) = part.strand(strand).map(|s| s.helix) {
        if part.insertions_mut().remove(helix, idx).is_some() {
            part.notify(PartNotification::InsertionRemoved { strand, idx });
        }
    }
}

fn add_annotation(part: &mut Part, strand: StrandId, kind: AnnotationKind, annotation: Annotation) {
    if let Some(s) = part.strand_mut(strand) {
        s.annotations_mut(kind)
            .insert(annotation.idx, annotation.clone());
        part.notify(PartNotification::annotation_added(strand, kind, annotation));
    }
}

fn remove_annotation(part: &mut Part, strand: StrandId, kind: AnnotationKind, idx: isize) {
    if let Some(s) = part.strand_mut(strand) {
        if s.annotations_mut(kind).remove(&idx).is_some() {
            part.notify(PartNotification::annotation_removed(strand, kind, idx));
        }
    }
}

fn connect(part: &mut Part, strand3p: StrandId, strand5p: StrandId) {
    if let Some(s) = part.strand_mut(strand3p) {
        s.strand3p = Some(strand5p);
    }
    if let Some(s) = part.strand_mut(strand5p) {
        s.strand5p = Some(strand3p);
    }
    part.notify(PartNotification::XoverInstalled { strand3p, strand5p });
}

fn disconnect(part: &mut Part, strand3p: StrandId, strand5p: StrandId) {
    if let Some(s) = part.strand_mut(strand3p) {
        if s.strand3p == Some(strand5p) {
            s.strand3p = None;
        }
    }
    if let Some(s) = part.strand_mut(strand5p) {
        if s.strand5p == Some(strand3p) {
            s.strand5p = None;
        }
    }
    part.notify(PartNotification::XoverRemoved { strand3p, strand5p });
}
