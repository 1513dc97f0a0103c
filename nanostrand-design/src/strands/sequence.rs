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
//! Sequences of strands.
//!
//! A sequence is stored from 5' to 3'. Whenever two strands of a helix must be aligned, their
//! sequences are first laid out from the low index to the high index. In that layout the base
//! `i` occupies a block of `1 + l` characters where `l` is the length of the insertion at `i` (so
//! a skipped base occupies no character).

use super::Strand;
use crate::{complement_base, overlap, Insertions};
use std::iter::repeat;

pub(crate) const BLANK: char = ' ';

impl Strand {
    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// The sequence of the strand from 5' to 3', padded with blanks or truncated to the total
    /// length of the strand.
    pub fn visible_sequence(&self, insertions: &Insertions) -> String {
        let total = self.total_length(insertions);
        match &self.sequence {
            Some(seq) => seq.chars().chain(repeat(BLANK)).take(total).collect(),
            None => repeat(BLANK).take(total).collect(),
        }
    }

    /// The characters of the sequence ordered from the low index to the high index.
    fn stored_low_to_high(&self, total_length: usize) -> Vec<char> {
        let mut ret: Vec<char> = match &self.sequence {
            Some(seq) => seq.chars().chain(repeat(BLANK)).take(total_length).collect(),
            None => vec![BLANK; total_length],
        };
        if !self.drawn_5to3 {
            ret.reverse();
        }
        ret
    }

    /// Use the first characters of `text` as the sequence of the strand.
    ///
    /// Return the used and unused portions of `text`. If `text` is `None`, the sequence is
    /// cleared and `(None, None)` is returned.
    pub fn set_sequence<'a>(
        &mut self,
        text: Option<&'a str>,
        insertions: &Insertions,
    ) -> (Option<&'a str>, Option<&'a str>) {
        if let Some(text) = text {
            let total = self.total_length(insertions);
            let split = text
                .char_indices()
                .nth(total)
                .map(|(i, _)| i)
                .unwrap_or_else(|| text.len());
            let (used, rest) = text.split_at(split);
            self.sequence = Some(used.to_string());
            (Some(used), Some(rest))
        } else {
            self.sequence = None;
            (None, None)
        }
    }

    /// Set the bases of `self` that are paired with bases of `partner` to the complement of the
    /// bases of `partner`.
    ///
    /// `text` is the 5' to 3' sequence of `partner`. If it is `None`, the paired bases of `self`
    /// are blanked. Bases of `self` outside of the overlap are left unchanged. A sequence made
    /// only of blanks is cleared.
    pub fn set_complement_sequence(
        &mut self,
        text: Option<&str>,
        partner: &Strand,
        insertions: &Insertions,
    ) {
        let (low, high) = match overlap(self.low, self.high, partner.low, partner.high) {
            Some(bounds) => bounds,
            None => return,
        };

        let mut stored = self.stored_low_to_high(self.total_length(insertions));

        let partner_total = partner.total_length(insertions);
        let source: Vec<char> = if let Some(text) = text {
            let mut chars: Vec<char> = text
                .chars()
                .chain(repeat(BLANK))
                .take(partner_total)
                .collect();
            if !partner.drawn_5to3 {
                chars.reverse();
            }
            chars.into_iter().map(complement_base).collect()
        } else {
            vec![BLANK; partner_total]
        };

        let dst = low - self.low + self.insertion_length_between(insertions, self.low, low - 1);
        let src =
            low - partner.low + partner.insertion_length_between(insertions, partner.low, low - 1);
        let width = high - low + 1 + self.insertion_length_between(insertions, low, high);
        for k in 0..width.max(0) as usize {
            let dst_char = stored.get_mut(dst as usize + k);
            let src_char = source.get(src as usize + k);
            if let (Some(d), Some(s)) = (dst_char, src_char) {
                *d = *s;
            }
        }

        if !self.drawn_5to3 {
            stored.reverse();
        }
        self.sequence = if stored.iter().all(|c| c.is_whitespace()) {
            None
        } else {
            Some(stored.into_iter().collect())
        };
    }

    /// Partition the sequence around the insertions of the strand.
    ///
    /// Return one `(idx, (bases, inserted))` item per insertion, by increasing index, where
    /// `bases` are the characters of the bases up to `idx` and `inserted` are the characters
    /// of the insertion. A skipped base is shown as a blank. A last item holds the remaining
    /// bases. Within each item the characters are given from 5' to 3'.
    pub fn sequence_list(&self, insertions: &Insertions) -> Vec<(isize, (String, String))> {
        let total = self.total_length(insertions);
        let seq = self.stored_low_to_high(total);
        let slice = |a: isize, b: isize| -> String {
            let a = (a.max(0) as usize).min(seq.len());
            let b = (b.max(0) as usize).min(seq.len()).max(a);
            seq[a..b].iter().collect()
        };

        let mut ret = Vec::new();
        let mut offset_last = 0;
        let mut length_so_far = 0;
        for insertion in self.insertions_on_strand(insertions, None, None) {
            let i_length = insertion.length();
            let index = insertion.idx();
            let mut offset = index + 1 - self.low + length_so_far;
            if i_length < 0 {
                offset -= 1;
            }
            length_so_far += i_length;
            let mut seq_item = slice(offset_last, offset);
            let seq_insertion = if i_length < 0 {
                seq_item.push(BLANK);
                offset_last = offset;
                String::new()
            } else {
                offset_last = offset + i_length;
                slice(offset, offset_last)
            };
            ret.push((index, (seq_item, seq_insertion)));
        }
        ret.push((
            self.low + total as isize,
            (slice(offset_last, total as isize), String::new()),
        ));

        if !self.drawn_5to3 {
            for (_, (seq_item, seq_insertion)) in ret.iter_mut() {
                *seq_item = seq_item.chars().rev().collect();
                *seq_insertion = seq_insertion.chars().rev().collect();
            }
        }
        ret
    }
}
