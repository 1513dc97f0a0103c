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

use super::*;

use std::fmt;

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.drawn_5to3 {
            write!(f, "[H{}: {} -> {}]", self.helix, self.low, self.high)
        } else {
            write!(f, "[H{}: {} <- {}]", self.helix, self.low, self.high)
        }
    }
}

impl fmt::Display for Insertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_skip() {
            write!(f, "[{}: skip]", self.idx())
        } else {
            write!(f, "[{}: @{}]", self.idx(), self.length())
        }
    }
}

impl Strand {
    /// A one line description of the strand and its connections.
    pub fn formated_connections(&self) -> String {
        let fmt_connection = |c: Option<StrandId>| match c {
            Some(id) => id.to_string(),
            None => String::from("[x]"),
        };
        format!(
            "{} 5': {} 3': {} {}",
            self.id,
            fmt_connection(self.strand5p),
            fmt_connection(self.strand3p),
            self
        )
    }
}
