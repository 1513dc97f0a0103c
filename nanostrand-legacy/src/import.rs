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
//! Reconstruction of a `Part` from a legacy design.
//!
//! The design is read once to collect the segments and the crossovers of each helix, and
//! checked for consistency before anything is built. The part is then built in three passes:
//! segments, crossovers, and finally insertions and staple colors.

use super::{
    is_3prime_xover, segment_boundaries, LegacyDesign, LegacyHelix, LegacyImportError,
};
use ahash::AHashSet;
use itertools::Itertools;
use nanostrand_design::{design_operations, Lattice, Part, PartParameters, StrandType};

const STRAND_TYPES: [StrandType; 2] = [StrandType::Scaffold, StrandType::Staple];

/// A strand of a legacy design covering `[low, high]` on `helix`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    helix: usize,
    strand_type: StrandType,
    low: isize,
    high: isize,
}

/// A connection from the 3' end of the strand ending at `(helix, idx)` to the 5' end of the
/// strand starting at `(target_helix, target_idx)`.
#[derive(Debug, Clone, Copy)]
struct Xover {
    strand_type: StrandType,
    helix: usize,
    idx: isize,
    target_helix: usize,
    target_idx: isize,
}

#[derive(Debug, Default)]
struct Topology {
    segments: Vec<Segment>,
    xovers: Vec<Xover>,
}

/// Parse a legacy design and build a part from it.
pub fn import_json(json: &str, parameters: PartParameters) -> Result<Part, LegacyImportError> {
    let design = LegacyDesign::from_json_str(json)?;
    import(&design, parameters)
}

/// Build a part from a legacy design.
///
/// The lattice is guessed from the number of bases of the helices, and the part is made large
/// enough to hold them. The operations are applied directly on the part, without being recorded.
pub fn import(
    design: &LegacyDesign,
    parameters: PartParameters,
) -> Result<Part, LegacyImportError> {
    let nb_bases = design.nb_bases().ok_or(LegacyImportError::EmptyDesign)?;
    check_lengths(design, nb_bases)?;
    let topology = read_topology(design)?;

    let mut parameters = parameters;
    if let Some(lattice) = Lattice::from_nb_bases(nb_bases) {
        parameters.lattice = lattice;
    } else {
        log::warn!(
            "Could not guess the lattice of helices of {} bases, using {:?}",
            nb_bases,
            parameters.lattice
        );
    }
    parameters.fit_nb_bases(nb_bases);

    let mut part = Part::new(parameters);
    for helix in design.vstrands.iter() {
        part.add_helix(helix.num, helix.row, helix.col)?;
    }

    log::info!("Installing {} segments", topology.segments.len());
    for s in topology.segments.iter() {
        let op = design_operations::create_strand(&part, s.helix, s.strand_type, s.low, s.high)?;
        part.execute(op);
    }

    log::info!("Installing {} crossovers", topology.xovers.len());
    for xover in topology.xovers.iter() {
        install_xover(&mut part, xover)?;
    }

    log::info!("Installing insertions and colors");
    for helix in design.vstrands.iter() {
        install_insertions(&mut part, helix)?;
    }
    for helix in design.vstrands.iter() {
        apply_staple_colors(&mut part, helix)?;
    }
    Ok(part)
}

fn check_lengths(design: &LegacyDesign, nb_bases: usize) -> Result<(), LegacyImportError> {
    for helix in design.vstrands.iter() {
        let lengths = [
            helix.scaf.len(),
            helix.stap.len(),
            helix.insertions.len(),
            helix.skip.len(),
        ];
        if lengths.iter().any(|l| *l != nb_bases) {
            return Err(LegacyImportError::MismatchedArrayLengths {
                helix: helix.num,
                expected: nb_bases,
            });
        }
    }
    Ok(())
}

fn read_topology(design: &LegacyDesign) -> Result<Topology, LegacyImportError> {
    let helices: AHashSet<isize> = design.vstrands.iter().map(|h| h.num as isize).collect();
    let mut ret = Topology::default();
    for helix in design.vstrands.iter() {
        let num = helix.num as isize;
        for strand_type in STRAND_TYPES.iter().cloned() {
            let mut boundaries = Vec::new();
            for (i, base) in helix.bases(strand_type).iter().enumerate() {
                let idx = i as isize;
                let nb_boundaries = segment_boundaries(strand_type, num, idx, base);
                boundaries.extend(std::iter::repeat(idx).take(nb_boundaries));
                let [_, _, three_vh, three_idx] = *base;
                if is_3prime_xover(strand_type, num, idx, three_vh, three_idx) {
                    if !helices.contains(&three_vh) {
                        return Err(LegacyImportError::UnknownHelix(three_vh));
                    }
                    ret.xovers.push(Xover {
                        strand_type,
                        helix: helix.num,
                        idx,
                        target_helix: three_vh as usize,
                        target_idx: three_idx,
                    });
                }
            }
            if boundaries.len() % 2 != 0 {
                return Err(LegacyImportError::OddSegmentBoundaries {
                    helix: helix.num,
                    strand_type,
                });
            }
            let segments = boundaries.into_iter().tuples().map(|(low, high)| Segment {
                helix: helix.num,
                strand_type,
                low,
                high,
            });
            ret.segments.extend(segments);
        }
    }
    Ok(ret)
}

fn install_xover(part: &mut Part, xover: &Xover) -> Result<(), LegacyImportError> {
    let from = part
        .strand_at(xover.helix, xover.strand_type, xover.idx)
        .filter(|s| s.idx3p() == xover.idx)
        .map(|s| s.id());
    let to = part
        .strand_at(xover.target_helix, xover.strand_type, xover.target_idx)
        .filter(|s| s.idx5p() == xover.target_idx)
        .map(|s| s.id());
    if let (Some(from), Some(to)) = (from, to) {
        let op = design_operations::install_xover(part, from, to)?;
        part.execute(op);
        Ok(())
    } else {
        Err(LegacyImportError::DanglingCrossover {
            helix: xover.helix,
            idx: xover.idx,
        })
    }
}

/// Install the insertions and skips of `helix` on the scaffold strand covering them, or on the
/// staple strand if there is no scaffold there.
fn install_insertions(part: &mut Part, helix: &LegacyHelix) -> Result<(), LegacyImportError> {
    let lengths = helix.insertions.iter().zip(helix.skip.iter());
    for (i, (insertion, skip)) in lengths.enumerate() {
        let length = insertion + skip;
        if length == 0 {
            continue;
        }
        let idx = i as isize;
        let strand = STRAND_TYPES
            .iter()
            .find_map(|t| part.strand_at(helix.num, *t, idx))
            .map(|s| s.id());
        if let Some(strand) = strand {
            let op = design_operations::add_insertion(part, strand, idx, length)?;
            part.execute(op);
        } else {
            log::warn!(
                "Ignoring insertion of length {} at base {} of helix {}, no strand covers it",
                length,
                idx,
                helix.num
            );
        }
    }
    Ok(())
}

fn apply_staple_colors(part: &mut Part, helix: &LegacyHelix) -> Result<(), LegacyImportError> {
    for (idx, color) in helix.stap_colors.iter() {
        let oligo = part
            .strand_at(helix.num, StrandType::Staple, *idx)
            .and_then(|s| s.oligo());
        if let Some(oligo) = oligo {
            let op = design_operations::set_oligo_color(part, oligo, color & 0xFF_FFFF)?;
            part.execute(op);
        } else {
            log::warn!("No staple at base {} of helix {} to color", idx, helix.num);
        }
    }
    Ok(())
}
