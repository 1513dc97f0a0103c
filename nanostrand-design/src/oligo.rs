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
//! Oligos are the maximal chains of connected strands.

use super::StrandId;

/// The identifier of an oligo. It is the identifier of its 5'-most strand, or of its strand with
/// the smallest identifier if the oligo is a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OligoId(pub usize);

impl From<StrandId> for OligoId {
    fn from(id: StrandId) -> Self {
        Self(id.0)
    }
}

impl std::fmt::Display for OligoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "O{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oligo {
    pub id: OligoId,
    /// The first strand of the oligo.
    pub strand5p: StrandId,
    pub strands: Vec<StrandId>,
    pub is_loop: bool,
    /// Number of nucleotides of the oligo.
    pub length: usize,
    pub color: u32,
}

impl Oligo {
    pub fn formated_color(&self) -> String {
        format!("#{:06x}", self.color)
    }
}
