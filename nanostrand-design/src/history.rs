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
//! A linear undo/redo history.
//!
//! The history stores `Transition`s, which are labelled groups of reversible commands. Undoing a
//! transition reverts its commands in the reverse order in which they were applied.

use std::borrow::Cow;

/// An action that can be applied to, and reverted from, a value of type `T`.
pub trait Reversible<T> {
    fn redo(&self, target: &mut T);
    fn undo(&self, target: &mut T);
}

/// A label describing an operation.
/// To create a `TransitionLabel`, use its `From<String>` or `From<'static str>` implementation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionLabel(Cow<'static, str>);

impl<T: Into<Cow<'static, str>>> From<T> for TransitionLabel {
    fn from(x: T) -> Self {
        Self(x.into())
    }
}

impl AsRef<str> for TransitionLabel {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl std::fmt::Display for TransitionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents an undoable operation.
#[derive(Clone, Debug)]
pub struct Transition<C> {
    /// A label describing the operation that was performed.
    pub label: TransitionLabel,
    pub commands: Vec<C>,
}

impl<T, C: Reversible<T>> Reversible<T> for Transition<C> {
    fn redo(&self, target: &mut T) {
        for c in self.commands.iter() {
            c.redo(target)
        }
    }

    fn undo(&self, target: &mut T) {
        for c in self.commands.iter().rev() {
            c.undo(target)
        }
    }
}

#[derive(Clone, Debug)]
pub struct UndoStack<C> {
    undo_stack: Vec<Transition<C>>,
    redo_stack: Vec<Transition<C>>,
}

impl<C> Default for UndoStack<C> {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }
}

impl<C> UndoStack<C> {
    /// Apply `transition` to `target` and record it. The redo stack is cleared.
    pub fn push_and_redo<T>(&mut self, target: &mut T, transition: Transition<C>)
    where
        C: Reversible<T>,
    {
        log::debug!("do {}", transition.label);
        transition.redo(target);
        self.redo_stack.clear();
        self.undo_stack.push(transition);
    }

    /// Revert the last transition. Return its label, or `None` if there was nothing to undo.
    pub fn undo<T>(&mut self, target: &mut T) -> Option<TransitionLabel>
    where
        C: Reversible<T>,
    {
        let transition = self.undo_stack.pop()?;
        log::debug!("undo {}", transition.label);
        transition.undo(target);
        let label = transition.label.clone();
        self.redo_stack.push(transition);
        Some(label)
    }

    /// Re-apply the last undone transition. Return its label, or `None` if there was nothing to
    /// redo.
    pub fn redo<T>(&mut self, target: &mut T) -> Option<TransitionLabel>
    where
        C: Reversible<T>,
    {
        let transition = self.redo_stack.pop()?;
        log::debug!("redo {}", transition.label);
        transition.redo(target);
        let label = transition.label.clone();
        self.undo_stack.push(transition);
        Some(label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&TransitionLabel> {
        self.undo_stack.last().map(|t| &t.label)
    }

    pub fn redo_label(&self) -> Option<&TransitionLabel> {
        self.redo_stack.last().map(|t| &t.label)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
