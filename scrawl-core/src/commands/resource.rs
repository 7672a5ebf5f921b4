use super::{CommandError, DoUndo, Edit, Slot};
use crate::{
    observer::DocumentObserver,
    state::{Document, EmbeddedResource, ModelError, ResourceID},
};

/// Embed or remove an external document.
///
/// Removal finds the resource by id, and remembers where it was so undo puts it back in the
/// same place.
#[derive(Debug)]
pub struct ResourceCommand {
    edit: Edit,
    id: ResourceID,
    /// Position in the document's resource list. `None` until known, for appends and removals
    /// that have not run yet.
    index: Option<usize>,
    slot: Slot<EmbeddedResource>,
}
impl ResourceCommand {
    pub(super) fn insert(index: Option<usize>, resource: EmbeddedResource) -> Self {
        Self {
            edit: Edit::Insert,
            id: resource.id(),
            index,
            slot: Slot::Held(resource),
        }
    }
    pub(super) fn delete(id: ResourceID) -> Self {
        Self {
            edit: Edit::Remove,
            id,
            index: None,
            slot: Slot::InModel,
        }
    }
    #[must_use]
    pub fn edit(&self) -> Edit {
        self.edit
    }
    #[must_use]
    pub fn id(&self) -> ResourceID {
        self.id
    }
    #[must_use]
    pub fn holds_resource(&self) -> bool {
        self.slot.is_held()
    }
    pub(super) fn apply(
        &mut self,
        how: DoUndo,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        log::trace!("{} {} {}", how.as_ref(), self.edit.as_ref(), self.id);
        if self.edit.attaches(how) {
            if !self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            let index = self.index.unwrap_or(document.resources().len());
            ModelError::check_insert(index, document.resources().len())?;
            let resource = self.slot.take().ok_or(CommandError::MismatchedState)?;
            document.add_resource(index, resource, observer)?;
            self.index = Some(index);
        } else {
            if self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            let index = document
                .resource_index(self.id)
                .ok_or(CommandError::UnknownResource)?;
            let resource = document.delete_resource(index, observer)?;
            self.index = Some(index);
            self.slot = Slot::Held(resource);
        }
        Ok(())
    }
}
