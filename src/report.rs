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
//! Listing of the staples of a part.

use nanostrand_design::Part;

/// A staple oligo as printed by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StapleReport {
    /// Helix and base index of the 5' end.
    pub start: (usize, isize),
    /// Helix and base index of the 3' end.
    pub end: (usize, isize),
    /// Bases without a sequence are shown as `?`.
    pub sequence: String,
    pub length: usize,
    pub color: String,
    pub is_loop: bool,
}

pub fn staple_reports(part: &Part) -> Vec<StapleReport> {
    part.oligos()
        .filter_map(|oligo| {
            let first = part.strand(*oligo.strands.first()?)?;
            let last = part.strand(*oligo.strands.last()?)?;
            if !first.strand_type().is_staple() {
                return None;
            }
            let sequence = part.oligo_sequence(oligo.id)?.replace(' ', "?");
            Some(StapleReport {
                start: (first.helix(), first.idx5p()),
                end: (last.helix(), last.idx3p()),
                sequence,
                length: oligo.length,
                color: oligo.formated_color(),
                is_loop: oligo.is_loop,
            })
        })
        .collect()
}

pub fn formated_staples(staples: &[StapleReport]) -> String {
    use std::fmt::Write;
    let mut ret = String::new();
    writeln!(&mut ret, "Start\tEnd\tSequence\tLength\tColor").unwrap_or_default();
    for s in staples.iter() {
        writeln!(
            &mut ret,
            "{}[{}]\t{}[{}]\t{}\t{}\t{}",
            s.start.0, s.start.1, s.end.0, s.end.1, s.sequence, s.length, s.color
        )
        .unwrap_or_default();
    }
    ret
}
