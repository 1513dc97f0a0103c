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
//! Parameters of a part.

use std::path::Path;
use thiserror::Error;

/// The lattice on which the virtual helices of a part are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lattice {
    Honeycomb,
    Square,
}

impl Lattice {
    /// The number of bases in one step of the lattice.
    pub fn step_size(&self) -> isize {
        match self {
            Self::Honeycomb => 21,
            Self::Square => 32,
        }
    }

    /// Guess the lattice of a part from the number of bases of its helices.
    ///
    /// Return `None` if `nb_bases` is a multiple of both step sizes or of none of them.
    pub fn from_nb_bases(nb_bases: usize) -> Option<Self> {
        let nb_bases = nb_bases as isize;
        let square = nb_bases % Self::Square.step_size() == 0;
        let honeycomb = nb_bases % Self::Honeycomb.step_size() == 0;
        match (square, honeycomb) {
            (true, false) => Some(Self::Square),
            (false, true) => Some(Self::Honeycomb),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartParameters {
    pub lattice: Lattice,
    /// Number of lattice steps of the virtual helices. The part bounds are derived from it.
    pub max_steps: usize,
    /// Color given to new scaffold oligos, as 0xRRGGBB.
    pub scaffold_color: u32,
    /// Color given to new staple oligos, as 0xRRGGBB.
    pub staple_color: u32,
}

impl PartParameters {
    pub const DEFAULT: PartParameters = PartParameters {
        lattice: Lattice::Honeycomb,
        max_steps: 2,
        scaffold_color: 0x0066cc,
        staple_color: 0x888888,
    };

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ParametersError> {
        let json_str = std::fs::read_to_string(path)?;
        let ret = serde_json::from_str(&json_str)?;
        Ok(ret)
    }

    pub fn min_base_idx(&self) -> isize {
        0
    }

    pub fn max_base_idx(&self) -> isize {
        self.lattice.step_size() * self.max_steps as isize - 1
    }

    /// Set the number of steps so that `nb_bases` bases fit in the part.
    pub fn fit_nb_bases(&mut self, nb_bases: usize) {
        let step = self.lattice.step_size() as usize;
        self.max_steps = ((nb_bases + step - 1) / step).max(1);
    }

    pub fn formated_string(&self) -> String {
        use std::fmt::Write;
        let mut ret = String::new();
        writeln!(&mut ret, "  Lattice: {:?}", self.lattice).unwrap_or_default();
        writeln!(
            &mut ret,
            "  Bases: [{}, {}]",
            self.min_base_idx(),
            self.max_base_idx()
        )
        .unwrap_or_default();
        ret
    }
}

impl std::default::Default for PartParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("could not read parameters file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse parameters file: {0}")]
    Json(#[from] serde_json::Error),
}
