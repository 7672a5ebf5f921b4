//! # Commands
//!
//! Commands are the only way an open document is edited (loading aside). Each one is a reversible
//! structural edit that *moves* its entity - pages, a stroke, an embedded resource - between the
//! document and itself:
//!
//! * An entity is always owned by exactly one of the document or the command, never both.
//! * An insertion holds its entity until done, and holds nothing after. Undoing takes it back.
//! * A removal holds nothing until done, and holds what it removed after.
//!
//! Doing an already-done command (or undoing an undone one) is refused with
//! [`CommandError::MismatchedState`] without touching the document. The [history](crate::history)
//! never does this, so seeing that error means the caller drove a command by hand out of order.

mod pages;
mod resource;
mod stroke;

pub use pages::PagesCommand;
pub use resource::ResourceCommand;
pub use stroke::StrokeCommand;

use crate::{
    observer::DocumentObserver,
    state::{
        document::Pages, Document, EmbeddedDocument, EmbeddedResource, LayerPath, ModelError,
        NormalLayer, Page, PdfLayer, ResourceID,
    },
    stroke::Stroke,
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("command applied to a state that does not match the one it expects")]
    MismatchedState,
    #[error("resource referenced by the command is not found")]
    UnknownResource,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Which way a command is being applied.
#[derive(strum::AsRefStr, Copy, Clone, PartialEq, Eq, Debug)]
pub enum DoUndo {
    Do,
    Undo,
}
impl DoUndo {
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Do => Self::Undo,
            Self::Undo => Self::Do,
        }
    }
}

/// What doing a command does to its entity.
#[derive(strum::AsRefStr, Copy, Clone, PartialEq, Eq, Debug)]
pub enum Edit {
    Insert,
    Remove,
}
impl Edit {
    /// Does applying the command this way move the entity into the document?
    fn attaches(self, how: DoUndo) -> bool {
        matches!(
            (self, how),
            (Self::Insert, DoUndo::Do) | (Self::Remove, DoUndo::Undo)
        )
    }
}

/// Where a command's entity currently lives.
#[derive(Debug)]
enum Slot<T> {
    /// In the document; the command holds nothing.
    InModel,
    /// Detached, exclusively owned by the command.
    Held(T),
}
impl<T> Slot<T> {
    fn is_held(&self) -> bool {
        matches!(self, Self::Held(_))
    }
    fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::InModel) {
            Self::Held(held) => Some(held),
            Self::InModel => None,
        }
    }
}

#[derive(Debug)]
pub enum Command {
    Pages(PagesCommand),
    Stroke(StrokeCommand),
    Resource(ResourceCommand),
    /// Several commands treated as one. Done in order, undone in reverse order.
    Group(Box<[Command]>),
}
impl From<PagesCommand> for Command {
    fn from(value: PagesCommand) -> Self {
        Self::Pages(value)
    }
}
impl From<StrokeCommand> for Command {
    fn from(value: StrokeCommand) -> Self {
        Self::Stroke(value)
    }
}
impl From<ResourceCommand> for Command {
    fn from(value: ResourceCommand) -> Self {
        Self::Resource(value)
    }
}
// Constructors
impl Command {
    #[must_use]
    pub fn insert_page(index: usize, page: Page) -> Self {
        PagesCommand::insert(index, smallvec::smallvec![page]).into()
    }
    #[must_use]
    pub fn insert_pages(index: usize, pages: impl IntoIterator<Item = Page>) -> Self {
        PagesCommand::insert(index, pages.into_iter().collect()).into()
    }
    #[must_use]
    pub fn delete_page(index: usize) -> Self {
        PagesCommand::delete(index, 1).into()
    }
    #[must_use]
    pub fn delete_pages(index: usize, count: usize) -> Self {
        PagesCommand::delete(index, count).into()
    }
    /// Append a finished stroke to a layer.
    #[must_use]
    pub fn add_stroke(at: LayerPath, stroke: Stroke) -> Self {
        StrokeCommand::add(at, stroke).into()
    }
    /// Remove the last stroke of a layer.
    #[must_use]
    pub fn remove_stroke(at: LayerPath) -> Self {
        StrokeCommand::remove(at).into()
    }
    /// Embed a resource after all existing ones.
    #[must_use]
    pub fn insert_resource(resource: EmbeddedResource) -> Self {
        ResourceCommand::insert(None, resource).into()
    }
    #[must_use]
    pub fn insert_resource_at(index: usize, resource: EmbeddedResource) -> Self {
        ResourceCommand::insert(Some(index), resource).into()
    }
    #[must_use]
    pub fn delete_resource(id: ResourceID) -> Self {
        ResourceCommand::delete(id).into()
    }
    #[must_use]
    pub fn group(commands: impl IntoIterator<Item = Command>) -> Self {
        Self::Group(commands.into_iter().collect())
    }
    /// Embed `source` and insert one page per embedded page starting at `index`. Each page shows its
    /// embedded page with an empty drawing layer on top.
    #[must_use]
    pub fn insert_pdf(index: usize, source: std::sync::Arc<dyn EmbeddedDocument>) -> Self {
        let resource = EmbeddedResource::new(source);
        let pages: Pages = (0..resource.source().page_count())
            .filter_map(|page| {
                let Some(size) = resource.source().page_size(page) else {
                    log::warn!("{} has no size for page {page}, skipping", resource.id());
                    return None;
                };
                Some(
                    Page::empty(size)
                        .with_layer(PdfLayer::new(resource.clone(), page))
                        .with_layer(NormalLayer::new()),
                )
            })
            .collect();
        Self::group([
            Self::insert_resource(resource),
            PagesCommand::insert(index, pages).into(),
        ])
    }
}
impl Command {
    /// Apply the command.
    pub fn redo(
        &mut self,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        self.apply(DoUndo::Do, document, observer)
    }
    /// Revert the command.
    pub fn undo(
        &mut self,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        self.apply(DoUndo::Undo, document, observer)
    }
    /// Apply in either direction. On error, the document is left as it was.
    pub fn apply(
        &mut self,
        how: DoUndo,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        match self {
            Self::Pages(command) => command.apply(how, document, observer),
            Self::Stroke(command) => command.apply(how, document, observer),
            Self::Resource(command) => command.apply(how, document, observer),
            Self::Group(children) => apply_group(children, how, document, observer),
        }
    }
    /// Does this command (or any part of a group) currently own a detached entity?
    #[must_use]
    pub fn holds_entity(&self) -> bool {
        match self {
            Self::Pages(command) => command.holds_pages(),
            Self::Stroke(command) => command.holds_stroke(),
            Self::Resource(command) => command.holds_resource(),
            Self::Group(children) => children.iter().any(Self::holds_entity),
        }
    }
}

fn apply_group(
    children: &mut [Command],
    how: DoUndo,
    document: &mut Document,
    observer: &mut dyn DocumentObserver,
) -> Result<(), CommandError> {
    let len = children.len();
    let nth = |step: usize| match how {
        DoUndo::Do => step,
        DoUndo::Undo => len - 1 - step,
    };
    for step in 0..len {
        if let Err(err) = children[nth(step)].apply(how, document, observer) {
            // Put back everything this group already did.
            for undo_step in (0..step).rev() {
                if let Err(rollback) =
                    children[nth(undo_step)].apply(how.inverse(), document, observer)
                {
                    log::error!("Failed to roll back partially applied group: {rollback}");
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        color::Color,
        geom::{Point, Size},
        observer::{Change, Recorder},
    };

    const A4: Size = Size::new(2100, 2970);

    fn dot(x: i32) -> Stroke {
        Stroke::pen(3, Color::BLACK).with_points([Point::new(x, x)])
    }
    fn one_page() -> Document {
        let mut document = Document::new();
        document.push_page(Page::new(A4));
        document
    }

    #[derive(Debug)]
    struct TwoPages;
    impl EmbeddedDocument for TwoPages {
        fn page_count(&self) -> usize {
            2
        }
        fn page_size(&self, page: usize) -> Option<Size> {
            (page < 2).then_some(Size::new(612, 792))
        }
    }

    #[test]
    fn stroke_ownership_moves() {
        let mut document = one_page();
        let at = LayerPath::new(0, 0);
        let mut command = Command::add_stroke(at, dot(1));
        assert!(command.holds_entity());

        command.redo(&mut document, &mut ()).unwrap();
        assert!(!command.holds_entity());
        assert_eq!(document.normal_layer(at).unwrap().strokes(), [dot(1)]);

        command.undo(&mut document, &mut ()).unwrap();
        assert!(command.holds_entity());
        assert!(document.normal_layer(at).unwrap().is_empty());
    }
    #[test]
    fn out_of_order_is_refused() {
        let mut document = one_page();
        let at = LayerPath::new(0, 0);
        let mut command = Command::add_stroke(at, dot(1));
        assert_eq!(
            command.undo(&mut document, &mut ()),
            Err(CommandError::MismatchedState)
        );
        command.redo(&mut document, &mut ()).unwrap();
        let before = document.clone();
        assert_eq!(
            command.redo(&mut document, &mut ()),
            Err(CommandError::MismatchedState)
        );
        assert_eq!(document, before);
    }
    #[test]
    fn remove_stroke_holds_after_redo() {
        let mut document = one_page();
        let at = LayerPath::new(0, 0);
        document.add_stroke(at, dot(1), &mut ()).unwrap();
        document.add_stroke(at, dot(2), &mut ()).unwrap();

        let mut command = Command::remove_stroke(at);
        assert!(!command.holds_entity());
        command.redo(&mut document, &mut ()).unwrap();
        assert!(command.holds_entity());
        assert_eq!(document.normal_layer(at).unwrap().strokes(), [dot(1)]);
        command.undo(&mut document, &mut ()).unwrap();
        assert_eq!(document.normal_layer(at).unwrap().strokes(), [dot(1), dot(2)]);

        let mut empty = Command::remove_stroke(LayerPath::new(0, 0));
        let mut document = one_page();
        assert_eq!(
            empty.redo(&mut document, &mut ()),
            Err(CommandError::Model(ModelError::EmptyLayer))
        );
    }
    #[test]
    fn delete_pages_round_trip() {
        let mut document = Document::new();
        for width in 1..=4 {
            document.push_page(Page::new(Size::new(width, 1)));
        }
        let before = document.clone();
        let mut command = Command::delete_pages(1, 2);
        command.redo(&mut document, &mut ()).unwrap();
        assert!(command.holds_entity());
        assert_eq!(
            document.pages().iter().map(|p| p.size().width).collect::<Vec<_>>(),
            [1, 4]
        );
        command.undo(&mut document, &mut ()).unwrap();
        assert!(!command.holds_entity());
        assert_eq!(document, before);

        let mut too_far = Command::delete_pages(3, 2);
        assert!(too_far.redo(&mut document, &mut ()).is_err());
        assert_eq!(document, before);
    }
    #[test]
    fn resource_returns_to_its_position() {
        let mut document = Document::new();
        let resources: Vec<_> = (0..3)
            .map(|_| EmbeddedResource::new(std::sync::Arc::new(TwoPages)))
            .collect();
        for resource in &resources {
            document.push_resource(resource.clone());
        }
        let mut command = Command::delete_resource(resources[1].id());
        command.redo(&mut document, &mut ()).unwrap();
        assert_eq!(document.resources(), [resources[0].clone(), resources[2].clone()]);
        command.undo(&mut document, &mut ()).unwrap();
        assert_eq!(document.resources(), resources.as_slice());

        let mut missing = Command::delete_resource(ResourceID::new());
        assert_eq!(
            missing.redo(&mut document, &mut ()),
            Err(CommandError::UnknownResource)
        );
    }
    #[test]
    fn failed_group_rolls_back() {
        let mut document = one_page();
        let before = document.clone();
        let mut group = Command::group([
            Command::add_stroke(LayerPath::new(0, 0), dot(1)),
            Command::insert_page(1, Page::new(A4)),
            // No such layer.
            Command::add_stroke(LayerPath::new(0, 7), dot(2)),
        ]);
        let mut recorder = Recorder::default();
        assert_eq!(
            group.redo(&mut document, &mut recorder),
            Err(CommandError::Model(ModelError::OutOfRange { index: 7, len: 1 }))
        );
        assert_eq!(document, before);
        // All the children got their entities back.
        let Command::Group(children) = &group else {
            unreachable!()
        };
        assert!(children.iter().all(Command::holds_entity));
        assert_eq!(
            recorder.changes,
            [
                Change::StrokeAdded {
                    at: LayerPath::new(0, 0)
                },
                Change::PagesAdded { index: 1, count: 1 },
                Change::PagesDeleted { index: 1, count: 1 },
                Change::StrokeDeleting {
                    at: LayerPath::new(0, 0),
                    remaining: 0
                },
                Change::StrokeDeleted {
                    at: LayerPath::new(0, 0)
                },
            ]
        );
    }
    #[test]
    fn insert_pdf_is_one_unit() {
        let mut document = one_page();
        let mut command = Command::insert_pdf(1, std::sync::Arc::new(TwoPages));
        let mut recorder = Recorder::default();
        command.redo(&mut document, &mut recorder).unwrap();
        assert!(!command.holds_entity());
        assert_eq!(document.page_count(), 3);
        assert_eq!(document.resources().len(), 1);
        let imported = document.page(2).unwrap();
        assert_eq!(imported.size(), Size::new(612, 792));
        let pdf = imported.layer(0).and_then(|layer| layer.pdf()).unwrap();
        assert_eq!(pdf.page(), 1);
        assert_eq!(pdf.resource_id(), document.resources()[0].id());
        assert!(imported.layer(1).and_then(|layer| layer.normal()).is_some());

        command.undo(&mut document, &mut recorder).unwrap();
        assert!(command.holds_entity());
        assert_eq!(document, one_page());
        assert_eq!(
            recorder.changes,
            [
                Change::ResourceAdded { index: 0 },
                Change::PagesAdded { index: 1, count: 2 },
                Change::PagesDeleted { index: 1, count: 2 },
                Change::ResourceDeleted { index: 0 },
            ]
        );
    }
}
