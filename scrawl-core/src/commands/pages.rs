use super::{CommandError, DoUndo, Edit, Slot};
use crate::{
    observer::DocumentObserver,
    state::{document::Pages, Document, ModelError},
};

/// Insert or remove a contiguous run of pages.
#[derive(Debug)]
pub struct PagesCommand {
    edit: Edit,
    index: usize,
    count: usize,
    slot: Slot<Pages>,
}
impl PagesCommand {
    pub(super) fn insert(index: usize, pages: Pages) -> Self {
        Self {
            edit: Edit::Insert,
            index,
            count: pages.len(),
            slot: Slot::Held(pages),
        }
    }
    pub(super) fn delete(index: usize, count: usize) -> Self {
        Self {
            edit: Edit::Remove,
            index,
            count,
            slot: Slot::InModel,
        }
    }
    #[must_use]
    pub fn edit(&self) -> Edit {
        self.edit
    }
    /// Index of the first page affected.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
    #[must_use]
    pub fn holds_pages(&self) -> bool {
        self.slot.is_held()
    }
    pub(super) fn apply(
        &mut self,
        how: DoUndo,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        log::trace!(
            "{} {} {} pages at {}",
            how.as_ref(),
            self.edit.as_ref(),
            self.count,
            self.index
        );
        if self.edit.attaches(how) {
            if !self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            // Validate before giving up ownership, so a failure leaves the pages with us.
            ModelError::check_insert(self.index, document.page_count())?;
            let pages = self.slot.take().ok_or(CommandError::MismatchedState)?;
            document.add_pages(self.index, pages, observer)?;
        } else {
            if self.slot.is_held() {
                return Err(CommandError::MismatchedState);
            }
            let pages = document.delete_pages(self.index, self.count, observer)?;
            self.slot = Slot::Held(pages);
        }
        Ok(())
    }
}
