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
//! Import of designs saved in the legacy (cadnano 2) JSON format.
//!
//! A legacy design is a list of virtual helices. For each base of a helix and for each strand
//! type, the file gives the position of the 5' and 3' neighbors of the base as a
//! `[five_vh, five_idx, three_vh, three_idx]` tuple, with `-1` standing for "no base".
//! The import reconstructs the segments and the crossovers from these tuples and builds a
//! `Part`.

#[macro_use]
extern crate serde_derive;
extern crate serde;

mod classify;
mod import;

pub use classify::{is_3prime_xover, is_segment_start_or_end, segment_boundaries};
pub use import::{import, import_json};

use nanostrand_design::{ErrOperation, StrandType};
use std::path::Path;
use thiserror::Error;

/// The neighbors of a base: `[five_vh, five_idx, three_vh, three_idx]`.
pub type LegacyBase = [isize; 4];

/// The position used in a `LegacyBase` when a neighbor does not exist.
pub const NO_BASE: isize = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDesign {
    #[serde(default)]
    pub name: String,
    pub vstrands: Vec<LegacyHelix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyHelix {
    pub num: usize,
    pub row: isize,
    pub col: isize,
    pub scaf: Vec<LegacyBase>,
    pub stap: Vec<LegacyBase>,
    /// Number of bases inserted after each base.
    #[serde(rename = "loop")]
    pub insertions: Vec<isize>,
    /// `-1` for each skipped base, `0` otherwise.
    pub skip: Vec<isize>,
    /// `(base index, 0xRRGGBB color)` of the staples starting on this helix.
    #[serde(default)]
    pub stap_colors: Vec<(isize, u32)>,
}

impl LegacyHelix {
    /// An helix of `nb_bases` empty bases.
    pub fn new(num: usize, row: isize, col: isize, nb_bases: usize) -> Self {
        Self {
            num,
            row,
            col,
            scaf: vec![[NO_BASE; 4]; nb_bases],
            stap: vec![[NO_BASE; 4]; nb_bases],
            insertions: vec![0; nb_bases],
            skip: vec![0; nb_bases],
            stap_colors: vec![],
        }
    }

    pub fn bases(&self, strand_type: StrandType) -> &[LegacyBase] {
        match strand_type {
            StrandType::Scaffold => &self.scaf,
            StrandType::Staple => &self.stap,
        }
    }

    pub fn bases_mut(&mut self, strand_type: StrandType) -> &mut Vec<LegacyBase> {
        match strand_type {
            StrandType::Scaffold => &mut self.scaf,
            StrandType::Staple => &mut self.stap,
        }
    }
}

impl LegacyDesign {
    pub fn from_json_str(json: &str) -> Result<Self, LegacyImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LegacyImportError> {
        let json_str = std::fs::read_to_string(path)?;
        Self::from_json_str(&json_str)
    }

    /// The number of bases of the helices of the design.
    pub fn nb_bases(&self) -> Option<usize> {
        self.vstrands.first().map(|h| h.scaf.len())
    }
}

/// An error that makes a legacy design impossible to import.
#[derive(Debug, Error)]
pub enum LegacyImportError {
    #[error("the design has no helix")]
    EmptyDesign,
    #[error("the arrays of helix {helix} do not all have {expected} elements")]
    MismatchedArrayLengths { helix: usize, expected: usize },
    #[error("odd number of segment ends for the {strand_type:?} strands of helix {helix}")]
    OddSegmentBoundaries {
        helix: usize,
        strand_type: StrandType,
    },
    #[error("helix {0} is referenced but not defined")]
    UnknownHelix(isize),
    #[error("the crossover from base {idx} of helix {helix} does not reach the 5' end of a strand")]
    DanglingCrossover { helix: usize, idx: isize },
    #[error(transparent)]
    Operation(#[from] ErrOperation),
    #[error("could not parse design: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read design: {0}")]
    Io(#[from] std::io::Error),
}
