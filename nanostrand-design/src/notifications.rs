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
//! Notifications emitted by a part after each change of its state.
//!
//! Notifications are delivered synchronously, after the change they describe is visible, in the
//! order in which the changes were applied.

use super::{Annotation, AnnotationKind, Insertion, OligoId, StrandId};
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum PartNotification {
    StrandAdded {
        strand: StrandId,
    },
    StrandResized {
        strand: StrandId,
        idxs: (isize, isize),
    },
    /// The connections of the strand changed.
    StrandUpdated {
        strand: StrandId,
    },
    StrandHasNewOligo {
        strand: StrandId,
    },
    /// The strand was taken out of its strand set.
    StrandRemoved {
        strand: StrandId,
    },
    /// The strand does not exist anymore. Always follows a `StrandRemoved`.
    StrandDestroyed {
        strand: StrandId,
    },
    /// The strands of one of the strand sets of the helix changed.
    PartStrandChanged {
        helix: usize,
    },
    XoverInstalled {
        strand3p: StrandId,
        strand5p: StrandId,
    },
    XoverRemoved {
        strand3p: StrandId,
        strand5p: StrandId,
    },
    InsertionAdded {
        strand: StrandId,
        insertion: Insertion,
    },
    InsertionChanged {
        strand: StrandId,
        insertion: Insertion,
    },
    InsertionRemoved {
        strand: StrandId,
        idx: isize,
    },
    DecoratorAdded {
        strand: StrandId,
        decorator: Annotation,
    },
    DecoratorChanged {
        strand: StrandId,
        decorator: Annotation,
    },
    DecoratorRemoved {
        strand: StrandId,
        idx: isize,
    },
    ModifierAdded {
        strand: StrandId,
        modifier: Annotation,
    },
    ModifierChanged {
        strand: StrandId,
        modifier: Annotation,
    },
    ModifierRemoved {
        strand: StrandId,
        idx: isize,
    },
    SequenceChanged {
        strand: StrandId,
    },
    OligoColorChanged {
        oligo: OligoId,
        color: u32,
    },
}

impl PartNotification {
    pub(crate) fn annotation_added(
        strand: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    ) -> Self {
        match kind {
            AnnotationKind::Decorator => Self::DecoratorAdded {
                strand,
                decorator: annotation,
            },
            AnnotationKind::Modifier => Self::ModifierAdded {
                strand,
                modifier: annotation,
            },
        }
    }

    pub(crate) fn annotation_changed(
        strand: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    ) -> Self {
        match kind {
            AnnotationKind::Decorator => Self::DecoratorChanged {
                strand,
                decorator: annotation,
            },
            AnnotationKind::Modifier => Self::ModifierChanged {
                strand,
                modifier: annotation,
            },
        }
    }

    pub(crate) fn annotation_removed(strand: StrandId, kind: AnnotationKind, idx: isize) -> Self {
        match kind {
            AnnotationKind::Decorator => Self::DecoratorRemoved { strand, idx },
            AnnotationKind::Modifier => Self::ModifierRemoved { strand, idx },
        }
    }
}

/// A receiver of the notifications of a part.
pub trait PartObserver {
    fn notify(&self, notification: &PartNotification);
}

impl PartObserver for Sender<PartNotification> {
    fn notify(&self, notification: &PartNotification) {
        if self.send(notification.clone()).is_err() {
            log::trace!("Notification {:?} was not received", notification);
        }
    }
}
