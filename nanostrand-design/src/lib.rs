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
//! This module defines the topology of a design.
//!
//! A design is a `Part` made of virtual helices. Each virtual helix carries two `StrandSet`, one
//! for the scaffold and one for the staples, and each `StrandSet` is an ordered collection of
//! non-overlapping `Strand`. Strands are linked to each other by their 5' and 3' connections,
//! and a maximal chain of connected strands forms an `Oligo`.
//!
//! Run-time manipulations of the topology are expressed as reversible `Command`s. A `Document`
//! records them on an `UndoStack` so that they can be undone and redone.

#[macro_use]
extern crate serde_derive;
extern crate serde;

pub mod commands;
pub mod design_operations;
mod document;
pub mod history;
mod insertions;
mod notifications;
mod oligo;
mod parameters;
mod part;
mod strand_set;
mod strands;

pub use commands::{Command, SequenceChange, StrandSwap};
pub use design_operations::{ErrOperation, Operation};
pub use document::Document;
pub use history::{Reversible, Transition, TransitionLabel, UndoStack};
pub use insertions::{Insertion, Insertions};
pub use notifications::{PartNotification, PartObserver};
pub use oligo::{Oligo, OligoId};
pub use parameters::{Lattice, ParametersError, PartParameters};
pub use part::{Part, Strands3p, VirtualHelix};
pub use strand_set::StrandSet;
pub use strands::*;

#[cfg(test)]
mod tests;

/// The identifier of a strand in the arena of a `Part`.
///
/// Strands refer to each other through their identifiers, which makes cyclic connections
/// harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StrandId(pub usize);

impl std::fmt::Display for StrandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// The two directions of a virtual helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrandType {
    Scaffold,
    Staple,
}

impl StrandType {
    pub fn is_scaffold(&self) -> bool {
        matches!(self, StrandType::Scaffold)
    }

    pub fn is_staple(&self) -> bool {
        matches!(self, StrandType::Staple)
    }

    /// The other direction of the same helix.
    pub fn complement(&self) -> Self {
        match self {
            StrandType::Scaffold => StrandType::Staple,
            StrandType::Staple => StrandType::Scaffold,
        }
    }
}

/// Return true if the strands of type `strand_type` on helix `helix` run 5' to 3' from the low
/// indices to the high indices.
///
/// Scaffold strands run low to high on even helices and high to low on odd ones, staples do the
/// opposite.
pub fn is_drawn_5to3(helix: usize, strand_type: StrandType) -> bool {
    (helix % 2 == 0) == strand_type.is_scaffold()
}

/// Return the intersection of the closed intervals `[low_a, high_a]` and `[low_b, high_b]`.
pub fn overlap(low_a: isize, high_a: isize, low_b: isize, high_b: isize) -> Option<(isize, isize)> {
    let low = low_a.max(low_b);
    let high = high_a.min(high_b);
    if low <= high {
        Some((low, high))
    } else {
        None
    }
}

/// The complement of a base. Unknown characters are left unchanged.
pub fn complement_base(c: char) -> char {
    match c {
        'A' => 'T',
        'T' | 'U' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' | 'u' => 'a',
        'c' => 'g',
        'g' => 'c',
        c => c,
    }
}
