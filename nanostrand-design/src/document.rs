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
//! A part whose modifications are recorded on an undo stack.

use super::design_operations::{self as ops, Operation};
use super::{
    Annotation, AnnotationKind, Command, ErrOperation, OligoId, Part, PartObserver,
    PartParameters, StrandId, StrandType, Transition, TransitionLabel, UndoStack,
};

#[derive(Debug, Default)]
pub struct Document {
    part: Part,
    undo_stack: UndoStack<Command>,
}

impl Document {
    pub fn new(parameters: PartParameters) -> Self {
        Self::from_part(Part::new(parameters))
    }

    /// Start recording the modifications of an existing part.
    pub fn from_part(part: Part) -> Self {
        Self {
            part,
            undo_stack: Default::default(),
        }
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn into_part(self) -> Part {
        self.part
    }

    pub fn subscribe(&mut self, observer: Box<dyn PartObserver>) {
        self.part.subscribe(observer)
    }

    /// Apply the commands of `operation` and record them as one undoable step.
    pub fn execute<T>(&mut self, operation: Operation<T>) -> T {
        if !operation.commands.is_empty() {
            let transition = Transition {
                label: operation.label,
                commands: operation.commands,
            };
            self.undo_stack.push_and_redo(&mut self.part, transition);
        }
        operation.output
    }

    pub fn undo(&mut self) -> Option<TransitionLabel> {
        self.undo_stack.undo(&mut self.part)
    }

    pub fn redo(&mut self) -> Option<TransitionLabel> {
        self.undo_stack.redo(&mut self.part)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_stack.can_redo()
    }

    pub fn undo_stack(&self) -> &UndoStack<Command> {
        &self.undo_stack
    }

    /// Add a virtual helix. This is not recorded on the undo stack.
    pub fn add_helix(&mut self, num: usize, row: isize, col: isize) -> Result<(), ErrOperation> {
        self.part.add_helix(num, row, col)
    }

    pub fn create_strand(
        &mut self,
        helix: usize,
        strand_type: StrandType,
        low: isize,
        high: isize,
    ) -> Result<StrandId, ErrOperation> {
        let op = ops::create_strand(&self.part, helix, strand_type, low, high)?;
        Ok(self.execute(op))
    }

    pub fn remove_strand(&mut self, id: StrandId) -> Result<(), ErrOperation> {
        let op = ops::remove_strand(&self.part, id)?;
        self.execute(op);
        Ok(())
    }

    pub fn resize(&mut self, id: StrandId, new_idxs: (isize, isize)) -> Result<(), ErrOperation> {
        let op = ops::resize(&self.part, id, new_idxs)?;
        self.execute(op);
        Ok(())
    }

    pub fn split(
        &mut self,
        id: StrandId,
        idx: isize,
    ) -> Result<(StrandId, StrandId), ErrOperation> {
        let op = ops::split(&self.part, id, idx)?;
        Ok(self.execute(op))
    }

    pub fn merge(&mut self, id: StrandId, idx: isize) -> Result<bool, ErrOperation> {
        let op = ops::merge(&self.part, id, idx)?;
        Ok(self.execute(op))
    }

    pub fn add_insertion(
        &mut self,
        id: StrandId,
        idx: isize,
        length: isize,
    ) -> Result<bool, ErrOperation> {
        let op = ops::add_insertion(&self.part, id, idx, length)?;
        Ok(self.execute(op))
    }

    pub fn remove_insertion(&mut self, id: StrandId, idx: isize) -> Result<bool, ErrOperation> {
        let op = ops::remove_insertion(&self.part, id, idx)?;
        Ok(self.execute(op))
    }

    pub fn change_insertion(
        &mut self,
        id: StrandId,
        idx: isize,
        new_length: isize,
    ) -> Result<bool, ErrOperation> {
        let op = ops::change_insertion(&self.part, id, idx, new_length)?;
        Ok(self.execute(op))
    }

    pub fn add_annotation(
        &mut self,
        id: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    ) -> Result<bool, ErrOperation> {
        let op = ops::add_annotation(&self.part, id, kind, annotation)?;
        Ok(self.execute(op))
    }

    pub fn remove_annotation(
        &mut self,
        id: StrandId,
        kind: AnnotationKind,
        idx: isize,
    ) -> Result<bool, ErrOperation> {
        let op = ops::remove_annotation(&self.part, id, kind, idx)?;
        Ok(self.execute(op))
    }

    pub fn change_annotation(
        &mut self,
        id: StrandId,
        kind: AnnotationKind,
        annotation: Annotation,
    ) -> Result<bool, ErrOperation> {
        let op = ops::change_annotation(&self.part, id, kind, annotation)?;
        Ok(self.execute(op))
    }

    pub fn install_xover(
        &mut self,
        strand3p: StrandId,
        strand5p: StrandId,
    ) -> Result<(), ErrOperation> {
        let op = ops::install_xover(&self.part, strand3p, strand5p)?;
        self.execute(op);
        Ok(())
    }

    pub fn remove_xover(&mut self, strand3p: StrandId) -> Result<(), ErrOperation> {
        let op = ops::remove_xover(&self.part, strand3p)?;
        self.execute(op);
        Ok(())
    }

    pub fn apply_sequence(&mut self, id: StrandId, text: Option<&str>) -> Result<(), ErrOperation> {
        let op = ops::apply_sequence(&self.part, id, text)?;
        self.execute(op);
        Ok(())
    }

    pub fn set_oligo_color(&mut self, oligo: OligoId, color: u32) -> Result<bool, ErrOperation> {
        let op = ops::set_oligo_color(&self.part, oligo, color)?;
        Ok(self.execute(op))
    }
}
