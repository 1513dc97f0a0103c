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
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver};

fn new_document() -> Document {
    let mut doc = Document::new(PartParameters::DEFAULT);
    for h in 0..4 {
        doc.add_helix(h, 0, h as isize).unwrap();
    }
    doc
}

fn listen(doc: &mut Document) -> Receiver<PartNotification> {
    let (tx, rx) = channel();
    doc.subscribe(Box::new(tx));
    rx
}

fn strand(doc: &Document, id: StrandId) -> &Strand {
    doc.part().strand(id).unwrap()
}

fn total_length(doc: &Document, id: StrandId) -> usize {
    doc.part().total_length(id).unwrap()
}

#[test]
fn total_length_with_insertions_and_skips() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    assert_eq!(strand(&doc, s).length(), 6);
    assert_eq!(total_length(&doc, s), 6);
    assert!(doc.add_insertion(s, 7, 3).unwrap());
    assert_eq!(total_length(&doc, s), 9);
    assert!(doc.add_insertion(s, 9, -1).unwrap());
    assert_eq!(total_length(&doc, s), 8);
}

#[test]
fn add_insertion_normalizes_skips() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    assert!(doc.add_insertion(s, 6, -3).unwrap());
    assert_eq!(doc.part().insertions().get(0, 6).map(|i| i.length()), Some(-1));
}

#[test]
fn add_insertion_on_occupied_index_does_nothing() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    assert!(doc.add_insertion(s, 6, 2).unwrap());
    assert!(!doc.add_insertion(s, 6, 4).unwrap());
    assert!(!doc.add_insertion(s, 7, 0).unwrap());
    assert_eq!(doc.part().insertions().get(0, 6).map(|i| i.length()), Some(2));
    assert_eq!(doc.part().insertions().len(), 1);
    assert_eq!(doc.add_insertion(s, 11, 1), Ok(false));
    doc.add_insertion(s, 8, -1).unwrap();
    assert_eq!(doc.remove_insertion(s, 4), Ok(false));
    assert_eq!(doc.change_insertion(s, 12, 3), Ok(false));
    assert_eq!(doc.part().insertions().len(), 2);
    // the ignored calls were not recorded
    doc.undo();
    doc.undo();
    assert!(doc.part().insertions().is_empty());
}

#[test]
fn change_insertion_to_zero_removes_it() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    doc.add_insertion(s, 7, 3).unwrap();
    assert!(doc.change_insertion(s, 7, 0).unwrap());
    assert!(!doc.part().insertions().contains(0, 7));
    assert_eq!(total_length(&doc, s), 6);
    doc.undo();
    assert_eq!(doc.part().insertions().get(0, 7).map(|i| i.length()), Some(3));
}

#[test]
fn change_insertion_in_place() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    doc.add_insertion(s, 7, 3).unwrap();
    let rx = listen(&mut doc);
    assert!(doc.change_insertion(s, 7, 5).unwrap());
    assert!(!doc.change_insertion(s, 8, 5).unwrap());
    doc.undo();
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications,
        vec![
            PartNotification::InsertionChanged {
                strand: s,
                insertion: Insertion::new(7, 5)
            },
            PartNotification::InsertionChanged {
                strand: s,
                insertion: Insertion::new(7, 3)
            },
        ]
    );
}

#[test]
fn insertion_notifications() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    let rx = listen(&mut doc);
    doc.add_insertion(s, 8, 2).unwrap();
    doc.remove_insertion(s, 8).unwrap();
    assert!(!doc.remove_insertion(s, 8).unwrap());
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications,
        vec![
            PartNotification::InsertionAdded {
                strand: s,
                insertion: Insertion::new(8, 2)
            },
            PartNotification::InsertionRemoved { strand: s, idx: 8 },
        ]
    );
}

#[test]
fn resize_then_undo() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 5, 10).unwrap();
    let rx = listen(&mut doc);
    doc.resize(s, (3, 12)).unwrap();
    assert_eq!(strand(&doc, s).idxs(), (3, 12));
    doc.undo();
    assert_eq!(strand(&doc, s).idxs(), (5, 10));
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications,
        vec![
            PartNotification::StrandResized {
                strand: s,
                idxs: (3, 12)
            },
            PartNotification::PartStrandChanged { helix: 0 },
            PartNotification::StrandResized {
                strand: s,
                idxs: (5, 10)
            },
            PartNotification::PartStrandChanged { helix: 0 },
        ]
    );
    doc.redo();
    assert_eq!(strand(&doc, s).idxs(), (3, 12));
}

#[test]
fn resize_is_bounded_by_neighbors() {
    let mut doc = new_document();
    let _a = doc.create_strand(0, StrandType::Scaffold, 0, 4).unwrap();
    let b = doc.create_strand(0, StrandType::Scaffold, 10, 15).unwrap();
    assert_eq!(doc.part().get_resize_bounds(b, 10), Ok((5, 14)));
    assert_eq!(doc.part().get_resize_bounds(b, 15), Ok((11, 41)));
    assert!(doc.part().get_resize_bounds(b, 12).is_err());
    assert_eq!(
        doc.resize(b, (3, 15)),
        Err(ErrOperation::ResizeOutOfBounds {
            strand: b,
            requested: (3, 15),
            bounds: (5, 14)
        })
    );
    assert!(doc.resize(b, (10, 42)).is_err());
    doc.resize(b, (5, 41)).unwrap();
    assert_eq!(strand(&doc, b).idxs(), (5, 41));
}

#[test]
fn resize_removes_uncovered_insertions() {
    let mut doc = new_document();
    let b = doc.create_strand(0, StrandType::Scaffold, 10, 20).unwrap();
    let _staple = doc.create_strand(0, StrandType::Staple, 17, 20).unwrap();
    doc.add_insertion(b, 14, 2).unwrap();
    doc.add_insertion(b, 18, 1).unwrap();
    doc.resize(b, (10, 12)).unwrap();
    assert!(!doc.part().insertions().contains(0, 14));
    // still covered by the staple strand
    assert!(doc.part().insertions().contains(0, 18));
    doc.undo();
    assert_eq!(strand(&doc, b).idxs(), (10, 20));
    assert!(doc.part().insertions().contains(0, 14));
}

#[test]
fn create_strand_errors() {
    let mut doc = new_document();
    doc.create_strand(0, StrandType::Scaffold, 0, 4).unwrap();
    assert!(matches!(
        doc.create_strand(0, StrandType::Scaffold, 3, 6),
        Err(ErrOperation::Overlap { .. })
    ));
    assert!(doc.create_strand(0, StrandType::Staple, 3, 6).is_ok());
    assert!(matches!(
        doc.create_strand(0, StrandType::Scaffold, 40, 50),
        Err(ErrOperation::OutOfPartBounds { idx: 50, .. })
    ));
    assert_eq!(
        doc.create_strand(0, StrandType::Scaffold, 8, 6),
        Err(ErrOperation::InvalidInterval { low: 8, high: 6 })
    );
    assert_eq!(
        doc.create_strand(9, StrandType::Scaffold, 0, 6),
        Err(ErrOperation::HelixDoesNotExist(9))
    );
}

#[test]
fn merge_without_adjacent_neighbor_does_nothing() {
    let mut doc = new_document();
    let _a = doc.create_strand(0, StrandType::Scaffold, 0, 4).unwrap();
    let b = doc.create_strand(0, StrandType::Scaffold, 5, 9).unwrap();
    let _c = doc.create_strand(0, StrandType::Scaffold, 15, 20).unwrap();
    assert_eq!(doc.merge(b, 9), Ok(false));
    assert_eq!(strand(&doc, b).idxs(), (5, 9));
    assert_eq!(
        doc.merge(b, 7),
        Err(ErrOperation::NotAnEndpoint { strand: b, idx: 7 })
    );
    assert_eq!(
        doc.undo_stack().undo_label().map(|l| l.to_string()),
        Some("Create strand".to_string())
    );
}

#[test]
fn merge_then_undo() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 4).unwrap();
    let b = doc.create_strand(0, StrandType::Scaffold, 5, 9).unwrap();
    doc.add_annotation(a, AnnotationKind::Decorator, Annotation::new(1, "x"))
        .unwrap();
    doc.add_annotation(b, AnnotationKind::Modifier, Annotation::new(6, "y"))
        .unwrap();
    let rx = listen(&mut doc);
    assert_eq!(doc.merge(b, 5), Ok(true));
    assert!(doc.part().strand(a).is_none());
    let merged = strand(&doc, b);
    assert_eq!(merged.idxs(), (0, 9));
    assert!(merged.decorators().contains_key(&1));
    assert!(merged.modifiers().contains_key(&6));
    assert_eq!(doc.part().oligos().count(), 1);
    let notifications: Vec<_> = rx.try_iter().collect();
    let removed = notifications
        .iter()
        .position(|n| *n == PartNotification::StrandRemoved { strand: a })
        .unwrap();
    assert_eq!(
        notifications[removed + 1],
        PartNotification::StrandDestroyed { strand: a }
    );
    assert!(notifications.contains(&PartNotification::StrandResized {
        strand: b,
        idxs: (0, 9)
    }));

    doc.undo();
    assert_eq!(strand(&doc, a).idxs(), (0, 4));
    assert_eq!(strand(&doc, b).idxs(), (5, 9));
    assert!(strand(&doc, b).decorators().is_empty());
    assert_eq!(doc.part().oligos().count(), 2);
}

#[test]
fn merge_keeps_outer_connections() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 4).unwrap();
    let b = doc.create_strand(0, StrandType::Scaffold, 5, 9).unwrap();
    let c = doc.create_strand(1, StrandType::Scaffold, 0, 9).unwrap();
    // the 3' end of b is at 9, the 5' end of c is at 9
    doc.install_xover(b, c).unwrap();
    assert!(doc.merge(a, 4).unwrap());
    let merged = strand(&doc, a);
    assert_eq!(merged.idxs(), (0, 9));
    assert_eq!(merged.connection3p(), Some(c));
    assert_eq!(strand(&doc, c).connection5p(), Some(a));
    assert_eq!(doc.part().oligos().count(), 1);
    doc.undo();
    assert_eq!(strand(&doc, c).connection5p(), Some(b));
}

#[test]
fn split_then_undo() {
    let mut doc = new_document();
    // a staple of an even helix is drawn from high to low: its 3' end is at 0
    let s = doc.create_strand(0, StrandType::Staple, 0, 9).unwrap();
    let t = doc.create_strand(1, StrandType::Staple, 0, 9).unwrap();
    doc.install_xover(s, t).unwrap();
    doc.add_annotation(s, AnnotationKind::Decorator, Annotation::new(2, "d"))
        .unwrap();
    doc.add_annotation(s, AnnotationKind::Modifier, Annotation::new(8, "m"))
        .unwrap();

    let (low, high) = doc.split(s, 4).unwrap();
    assert!(doc.part().strand(s).is_none());
    let low_strand = strand(&doc, low);
    let high_strand = strand(&doc, high);
    assert_eq!(low_strand.idxs(), (0, 4));
    assert_eq!(high_strand.idxs(), (5, 9));
    assert_eq!(low_strand.connection3p(), Some(t));
    assert_eq!(low_strand.connection5p(), None);
    assert_eq!(high_strand.connection3p(), None);
    assert_eq!(strand(&doc, t).connection5p(), Some(low));
    assert_eq!(low_strand.decorators().keys().collect::<Vec<_>>(), vec![&2]);
    assert!(low_strand.modifiers().is_empty());
    assert!(high_strand.decorators().is_empty());
    assert_eq!(high_strand.modifiers().keys().collect::<Vec<_>>(), vec![&8]);
    assert_eq!(doc.part().oligos().count(), 2);

    assert!(doc.split(s, 4).is_err());
    assert!(matches!(
        doc.split(low, 4),
        Err(ErrOperation::SplitOutOfRange { .. })
    ));

    doc.undo();
    assert!(doc.part().strand(low).is_none());
    assert_eq!(strand(&doc, s).idxs(), (0, 9));
    assert_eq!(strand(&doc, t).connection5p(), Some(s));
    assert_eq!(strand(&doc, s).decorators().len(), 1);
    assert_eq!(strand(&doc, s).modifiers().len(), 1);
}

#[test]
fn split_and_merge_back() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 0, 9).unwrap();
    doc.apply_sequence(s, Some("ACGTACGTAC")).unwrap();
    let (low, high) = doc.split(s, 3).unwrap();
    assert_eq!(strand(&doc, low).sequence(), Some("ACGT"));
    assert_eq!(strand(&doc, high).sequence(), Some("ACGTAC"));
    assert!(doc.merge(low, 3).unwrap());
    assert_eq!(strand(&doc, low).idxs(), (0, 9));
    assert_eq!(strand(&doc, low).sequence(), Some("ACGTACGTAC"));
}

#[test]
fn crossovers_make_loops() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 9).unwrap();
    let b = doc.create_strand(1, StrandType::Scaffold, 0, 9).unwrap();
    let staple = doc.create_strand(1, StrandType::Staple, 0, 9).unwrap();
    assert_eq!(doc.part().oligos().count(), 3);
    doc.install_xover(a, b).unwrap();
    assert_eq!(doc.part().oligos().count(), 2);
    assert!(strand(&doc, a).has_xover_at(9));
    assert!(!strand(&doc, a).has_xover_at(0));
    assert!(!strand(&doc, a).has_xover_at(5));
    assert_eq!(
        doc.install_xover(a, b),
        Err(ErrOperation::EndAlreadyConnected {
            strand: a,
            prime: "3'"
        })
    );
    assert_eq!(
        doc.install_xover(b, staple),
        Err(ErrOperation::IncompatibleStrandTypes(b, staple))
    );
    doc.install_xover(b, a).unwrap();
    let oligo = doc.part().oligo_of(b).unwrap();
    assert!(oligo.is_loop);
    assert_eq!(oligo.id, OligoId(a.0));
    assert_eq!(oligo.length, 20);
    assert_eq!(doc.part().nb_xovers(), 2);

    let mut chain = doc.part().strands_3p_from(b);
    let ids: Vec<StrandId> = (&mut chain).map(|s| s.id()).collect();
    assert_eq!(ids, vec![b, a]);
    assert!(chain.reached_origin());

    doc.remove_xover(b).unwrap();
    let oligo = doc.part().oligo_of(b).unwrap();
    assert!(!oligo.is_loop);
    assert_eq!(oligo.strand5p, a);
    assert_eq!(
        doc.remove_xover(b),
        Err(ErrOperation::NoConnection(b))
    );
    let mut chain = doc.part().strands_3p_from(a);
    assert_eq!((&mut chain).count(), 2);
    assert!(!chain.reached_origin());
}

#[test]
fn new_oligo_notifications() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 9).unwrap();
    let b = doc.create_strand(1, StrandType::Scaffold, 0, 9).unwrap();
    let rx = listen(&mut doc);
    doc.install_xover(a, b).unwrap();
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications,
        vec![
            PartNotification::XoverInstalled {
                strand3p: a,
                strand5p: b
            },
            PartNotification::StrandHasNewOligo { strand: b },
        ]
    );
    assert_eq!(strand(&doc, b).oligo(), Some(OligoId(a.0)));
}

#[test]
fn oligo_color_is_inherited() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Staple, 0, 9).unwrap();
    let b = doc.create_strand(1, StrandType::Staple, 0, 9).unwrap();
    let oligo_a = doc.part().oligo_of(a).unwrap().id;
    assert_eq!(doc.part().oligo(oligo_a).unwrap().color, 0x888888);
    assert!(doc.set_oligo_color(oligo_a, 0xff0000).unwrap());
    assert!(!doc.set_oligo_color(oligo_a, 0xff0000).unwrap());
    // the 3' end of a is at 0, the 5' end of b is at 0
    doc.install_xover(a, b).unwrap();
    assert_eq!(doc.part().oligo_of(b).unwrap().color, 0xff0000);
    doc.undo();
    doc.undo();
    assert_eq!(doc.part().oligo(oligo_a).unwrap().color, 0x888888);
}

#[test]
fn oligo_colors_survive_undo() {
    let mut doc = new_document();
    let red = 0xff0000;
    // a staple of an even helix is drawn from high to low: its 5' end is at 9
    let s = doc.create_strand(0, StrandType::Staple, 0, 9).unwrap();
    let oligo = doc.part().oligo_of(s).unwrap().id;
    doc.set_oligo_color(oligo, red).unwrap();

    let (low, high) = doc.split(s, 7).unwrap();
    assert_eq!(doc.part().oligo_of(high).unwrap().color, red);
    assert_eq!(doc.part().oligo_of(low).unwrap().color, 0x888888);
    doc.undo();
    assert_eq!(doc.part().oligo_of(s).unwrap().color, red);
    doc.redo();
    assert_eq!(doc.part().oligo_of(high).unwrap().color, red);
    doc.undo();

    doc.remove_strand(s).unwrap();
    assert!(doc.part().oligo_of(s).is_none());
    doc.undo();
    assert_eq!(doc.part().oligo_of(s).unwrap().color, red);

    let a = doc.create_strand(1, StrandType::Staple, 0, 4).unwrap();
    let b = doc.create_strand(1, StrandType::Staple, 5, 9).unwrap();
    let oligo_a = doc.part().oligo_of(a).unwrap().id;
    let oligo_b = doc.part().oligo_of(b).unwrap().id;
    doc.set_oligo_color(oligo_a, 0x0000ff).unwrap();
    doc.set_oligo_color(oligo_b, 0x00ff00).unwrap();
    assert!(doc.merge(a, 4).unwrap());
    assert_eq!(doc.part().oligo_of(a).unwrap().color, 0x0000ff);
    doc.undo();
    assert_eq!(doc.part().oligo_of(a).unwrap().color, 0x0000ff);
    assert_eq!(doc.part().oligo_of(b).unwrap().color, 0x00ff00);
}

#[test]
fn remove_strand_clears_connections() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 9).unwrap();
    let b = doc.create_strand(1, StrandType::Scaffold, 0, 9).unwrap();
    doc.install_xover(a, b).unwrap();
    doc.add_insertion(a, 3, 1).unwrap();
    let rx = listen(&mut doc);
    doc.remove_strand(a).unwrap();
    assert!(doc.part().strand(a).is_none());
    assert_eq!(strand(&doc, b).connection5p(), None);
    assert!(doc.part().insertions().is_empty());
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications[0],
        PartNotification::InsertionRemoved { strand: a, idx: 3 }
    );
    let removed = notifications
        .iter()
        .position(|n| *n == PartNotification::StrandRemoved { strand: a })
        .unwrap();
    assert_eq!(
        notifications[removed + 1],
        PartNotification::StrandDestroyed { strand: a }
    );

    doc.undo();
    assert_eq!(strand(&doc, b).connection5p(), Some(a));
    assert_eq!(strand(&doc, a).connection3p(), Some(b));
    assert!(doc.part().insertions().contains(0, 3));
}

#[test]
fn sequence_is_propagated_to_paired_strands() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 7).unwrap();
    let t = doc.create_strand(0, StrandType::Staple, 0, 3).unwrap();
    let u = doc.create_strand(0, StrandType::Staple, 4, 9).unwrap();
    doc.apply_sequence(a, Some("AAAACCCCGG")).unwrap();
    assert_eq!(strand(&doc, a).sequence(), Some("AAAACCCC"));
    assert_eq!(strand(&doc, t).sequence(), Some("TTTT"));
    // u is drawn from 9 to 4, its bases 9 and 8 are not paired
    assert_eq!(strand(&doc, u).visible_sequence(doc.part().insertions()), "  GGGG");
    let oligo_t = doc.part().oligo_of(t).unwrap().id;
    assert_eq!(doc.part().oligo_sequence(oligo_t), Some("TTTT".to_string()));

    doc.undo();
    assert_eq!(strand(&doc, a).sequence(), None);
    assert_eq!(strand(&doc, t).sequence(), None);
    doc.redo();
    doc.apply_sequence(a, None).unwrap();
    assert_eq!(strand(&doc, a).sequence(), None);
    assert_eq!(strand(&doc, u).sequence(), None);
}

#[test]
fn sequence_follows_the_oligo() {
    let mut doc = new_document();
    let a = doc.create_strand(0, StrandType::Scaffold, 0, 3).unwrap();
    let b = doc.create_strand(1, StrandType::Scaffold, 0, 3).unwrap();
    doc.install_xover(a, b).unwrap();
    doc.add_insertion(b, 1, 2).unwrap();
    doc.apply_sequence(b, Some("ACGTACGTACGT")).unwrap();
    assert_eq!(strand(&doc, a).sequence(), Some("ACGT"));
    assert_eq!(strand(&doc, b).sequence(), Some("ACGTAC"));
    let oligo = doc.part().oligo_of(a).unwrap();
    assert_eq!(oligo.length, 10);
}

#[test]
fn annotations() {
    let mut doc = new_document();
    let s = doc.create_strand(0, StrandType::Scaffold, 0, 9).unwrap();
    let rx = listen(&mut doc);
    assert!(doc
        .add_annotation(s, AnnotationKind::Decorator, Annotation::new(3, "a"))
        .unwrap());
    assert!(!doc
        .add_annotation(s, AnnotationKind::Decorator, Annotation::new(3, "b"))
        .unwrap());
    assert!(doc
        .change_annotation(s, AnnotationKind::Decorator, Annotation::new(3, "b"))
        .unwrap());
    assert!(doc.remove_annotation(s, AnnotationKind::Decorator, 3).unwrap());
    assert!(doc
        .add_annotation(s, AnnotationKind::Modifier, Annotation::new(12, "c"))
        .is_err());
    let notifications: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        notifications,
        vec![
            PartNotification::DecoratorAdded {
                strand: s,
                decorator: Annotation::new(3, "a")
            },
            PartNotification::DecoratorChanged {
                strand: s,
                decorator: Annotation::new(3, "b")
            },
            PartNotification::DecoratorRemoved { strand: s, idx: 3 },
        ]
    );
}

/// Reassemble the 5' to 3' sequence from the partition of `Strand::sequence_list`.
fn reassemble(strand: &Strand, list: &[(isize, (String, String))]) -> String {
    if strand.is_drawn_5to3() {
        list.iter()
            .map(|(_, (bases, inserted))| format!("{}{}", bases, inserted))
            .collect()
    } else {
        list.iter()
            .rev()
            .map(|(_, (bases, inserted))| format!("{}{}", inserted, bases))
            .collect()
    }
}

/// The characters of each base of `strand`, laid out from low to high index.
fn blocks(strand: &Strand, insertions: &Insertions) -> BTreeMap<isize, Vec<char>> {
    let mut chars: Vec<char> = strand.visible_sequence(insertions).chars().collect();
    if !strand.is_drawn_5to3() {
        chars.reverse();
    }
    let mut ret = BTreeMap::new();
    let mut chars = chars.into_iter();
    for i in strand.low_idx()..=strand.high_idx() {
        let size = insertions
            .get(strand.helix(), i)
            .map(|ins| (1 + ins.length()).max(0) as usize)
            .unwrap_or(1);
        ret.insert(i, (&mut chars).take(size).collect());
    }
    ret
}

fn insertion_registry(helix: usize, insertions: &[(isize, isize)]) -> Insertions {
    let mut ret = Insertions::default();
    for (idx, length) in insertions.iter() {
        if *length != 0 {
            ret.insert(helix, Insertion::new(*idx, *length));
        }
    }
    ret
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn sequence_round_trip(
        helix in 0usize..4,
        low in 0isize..20,
        len in 1isize..20,
        text in "[ACGT]{0,50}",
    ) {
        let insertions = Insertions::default();
        let mut s = Strand::new(StrandId(0), helix, StrandType::Scaffold, low, low + len - 1);
        let (used, _) = s.set_sequence(Some(text.as_str()), &insertions);
        let expected: String = text.chars().take(len as usize).collect();
        prop_assert_eq!(used, Some(expected.as_str()));
        let list = s.sequence_list(&insertions);
        prop_assert_eq!(list.len(), 1);
        let padded = format!("{:width$}", expected, width = len as usize);
        prop_assert_eq!(reassemble(&s, &list), padded);
    }

    #[test]
    fn sequence_list_partitions_the_sequence(
        helix in 0usize..4,
        low in 0isize..10,
        len in 1isize..20,
        raw_insertions in proptest::collection::vec((0isize..30, 1isize..4), 0..5),
        text in "[ACGT]{60}",
    ) {
        let insertions = insertion_registry(helix, &raw_insertions);
        let mut s = Strand::new(StrandId(0), helix, StrandType::Staple, low, low + len - 1);
        s.set_sequence(Some(text.as_str()), &insertions);
        let list = s.sequence_list(&insertions);
        prop_assert_eq!(list.len(), s.insertions_on_strand(&insertions, None, None).count() + 1);
        prop_assert_eq!(reassemble(&s, &list), s.visible_sequence(&insertions));
    }

    #[test]
    fn complement_matches_base_pairing(
        helix in 0usize..4,
        scaffold_low in 0isize..15,
        scaffold_len in 1isize..15,
        staple_low in 0isize..15,
        staple_len in 1isize..15,
        raw_insertions in proptest::collection::vec((0isize..30, -1isize..4), 0..6),
        text in "[ACGT]{80}",
    ) {
        let insertions = insertion_registry(helix, &raw_insertions);
        let scaffold_high = scaffold_low + scaffold_len - 1;
        let staple_high = staple_low + staple_len - 1;
        let mut scaffold =
            Strand::new(StrandId(0), helix, StrandType::Scaffold, scaffold_low, scaffold_high);
        let mut staple =
            Strand::new(StrandId(1), helix, StrandType::Staple, staple_low, staple_high);
        scaffold.set_sequence(Some(text.as_str()), &insertions);
        staple.set_complement_sequence(scaffold.sequence(), &scaffold, &insertions);

        let scaffold_blocks = blocks(&scaffold, &insertions);
        let staple_blocks = blocks(&staple, &insertions);
        for (i, chars) in staple_blocks.iter() {
            if let Some(paired) = scaffold_blocks.get(i) {
                let expected: Vec<char> = paired.iter().cloned().map(complement_base).collect();
                prop_assert_eq!(chars, &expected);
            } else {
                prop_assert!(chars.iter().all(|c| *c == ' '));
            }
        }
    }

    #[test]
    fn complement_of_complement_is_identity(
        low in 0isize..15,
        len in 1isize..15,
        raw_insertions in proptest::collection::vec((0isize..30, 1isize..4), 0..4),
        text in "[ACGT]{60}",
    ) {
        let insertions = insertion_registry(0, &raw_insertions);
        let mut scaffold = Strand::new(StrandId(0), 0, StrandType::Scaffold, low, low + len - 1);
        let mut staple = Strand::new(StrandId(1), 0, StrandType::Staple, low, low + len - 1);
        scaffold.set_sequence(Some(text.as_str()), &insertions);
        staple.set_complement_sequence(scaffold.sequence(), &scaffold, &insertions);
        let mut copy = Strand::new(StrandId(2), 0, StrandType::Scaffold, low, low + len - 1);
        copy.set_complement_sequence(staple.sequence(), &staple, &insertions);
        prop_assert_eq!(copy.sequence(), scaffold.sequence());
    }
}
