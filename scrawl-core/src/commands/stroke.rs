use super::{CommandError, DoUndo, Edit, Slot};
use crate::{
    observer::DocumentObserver,
    state::{Document, LayerPath},
    stroke::Stroke,
};

/// Append a stroke to, or remove the last stroke from, a drawing layer.
#[derive(Debug)]
pub struct StrokeCommand {
    edit: Edit,
    at: LayerPath,
    slot: Slot<Stroke>,
}
impl StrokeCommand {
    pub(super) fn add(at: LayerPath, stroke: Stroke) -> Self {
        Self {
            edit: Edit::Insert,
            at,
            slot: Slot::Held(stroke),
        }
    }
    pub(super) fn remove(at: LayerPath) -> Self {
        Self {
            edit: Edit::Remove,
            at,
            slot: Slot::InModel,
        }
    }
    #[must_use]
    pub fn edit(&self) -> Edit {
        self.edit
    }
    #[must_use]
    pub fn at(&self) -> LayerPath {
        self.at
    }
    #[must_use]
    pub fn holds_stroke(&self) -> bool {
        self.slot.is_held()
    }
    pub(super) fn apply(
        &mut self,
        how: DoUndo,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        log::trace!("{} {} stroke at {:?}", how.as_ref(), self.edit.as_ref(), self.at);
        if self.edit.attaches(how) {
            if !self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            document.normal_layer(self.at)?;
            let stroke = self.slot.take().ok_or(CommandError::MismatchedState)?;
            document.add_stroke(self.at, stroke, observer)?;
        } else {
            if self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            let stroke = document.delete_stroke(self.at, observer)?;
            self.slot = Slot::Held(stroke);
        }
        Ok(())
    }
}
