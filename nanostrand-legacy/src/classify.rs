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
//! Classification of the bases of a legacy design.

use super::{LegacyBase, NO_BASE};
use nanostrand_design::{is_drawn_5to3, StrandType};

/// The indices of the natural 5' and 3' neighbors of base `idx`.
fn natural_neighbors(strand_type: StrandType, helix: isize, idx: isize) -> (isize, isize) {
    if is_drawn_5to3(helix as usize, strand_type) {
        (idx - 1, idx + 1)
    } else {
        (idx + 1, idx - 1)
    }
}

/// Return true if the base `base_idx` of helix `helix` is the first or the last base of a
/// segment.
pub fn is_segment_start_or_end(
    strand_type: StrandType,
    helix: isize,
    base_idx: isize,
    five_vh: isize,
    five_idx: isize,
    three_vh: isize,
    three_idx: isize,
) -> bool {
    let (natural_5, natural_3) = natural_neighbors(strand_type, helix, base_idx);
    if (five_vh == helix) != (three_vh == helix) {
        return true;
    }
    if five_vh == helix && five_idx != natural_5 {
        return true;
    }
    if three_vh == helix && three_idx != natural_3 {
        return true;
    }
    (five_vh == NO_BASE) != (three_vh == NO_BASE)
}

/// Return true if the 3' neighbor of base `base_idx` exists and is not its natural 3' neighbor.
pub fn is_3prime_xover(
    strand_type: StrandType,
    helix: isize,
    base_idx: isize,
    three_vh: isize,
    three_idx: isize,
) -> bool {
    if three_vh == NO_BASE {
        false
    } else if three_vh != helix {
        true
    } else {
        three_idx != natural_neighbors(strand_type, helix, base_idx).1
    }
}

/// The number of segment ends at a base: 0 for an empty base or a base inside a segment, 1 for
/// the first or the last base of a segment and 2 for a segment made of a single base.
pub fn segment_boundaries(
    strand_type: StrandType,
    helix: isize,
    base_idx: isize,
    base: &LegacyBase,
) -> usize {
    let [five_vh, five_idx, three_vh, three_idx] = *base;
    if five_vh == NO_BASE && three_vh == NO_BASE {
        return 0;
    }
    if !is_segment_start_or_end(
        strand_type,
        helix,
        base_idx,
        five_vh,
        five_idx,
        three_vh,
        three_idx,
    ) {
        // a base between two crossovers is a segment on its own
        return if five_vh != helix && three_vh != helix {
            2
        } else {
            0
        };
    }
    let (natural_5, natural_3) = natural_neighbors(strand_type, helix, base_idx);
    let broken_5 = five_vh != helix || five_idx != natural_5;
    let broken_3 = three_vh != helix || three_idx != natural_3;
    broken_5 as usize + broken_3 as usize
}
