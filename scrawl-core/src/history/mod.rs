//! # History
//!
//! The undo log of a document. Commands are kept in a tree rather than a stack: undoing and then
//! doing something new starts a new branch, and the undone branch stays around (still holding the
//! entities it detached) so it can be returned to with [`History::checkout`].
//!
//! The "present" is a node in the tree. Everything on the path from the root to the present has been
//! done, everything else is undone. Moving the present from one node to another walks the shortest
//! path between them: undo up to their nearest common ancestor, then redo down.

mod traverse;

use crate::{
    commands::{Command, CommandError, DoUndo},
    observer::DocumentObserver,
    state::Document,
};
use traverse::{nearest_ancestor, path, Step};
pub use traverse::TraverseError;

pub type NodeId = slab_tree::NodeId;

enum Entry {
    /// Start of history, before any command. Never done or undone.
    Root,
    Command(Command),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Traverse(#[from] TraverseError),
}

pub struct History {
    /// "First child" is the oldest branch, "last child" the most recent one.
    tree: slab_tree::Tree<Entry>,
    root: NodeId,
    present: NodeId,
    /// Where the document was last saved, or loaded/created.
    saved: NodeId,
}
impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("present", &self.present)
            .field("saved", &self.saved)
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
impl Default for History {
    fn default() -> Self {
        let tree = slab_tree::TreeBuilder::new().with_root(Entry::Root).build();
        // Built with a root just above.
        let root = tree.root_id().expect("tree has a root");
        Self {
            tree,
            root,
            present: root,
            saved: root,
        }
    }
}
impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Do `command` and record it as the new present.
    ///
    /// If it fails, the document and history are unchanged and the command is handed back.
    pub fn push(
        &mut self,
        mut command: Command,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<NodeId, (CommandError, Command)> {
        if let Err(err) = command.redo(document, observer) {
            return Err((err, command));
        }
        log::trace!("Recorded command: {command:#?}");
        let Some(mut present) = self.tree.get_mut(self.present) else {
            // The tree is never trimmed, so the present always exists.
            unreachable!("present node {:?} missing from history", self.present);
        };
        self.present = present.append(Entry::Command(command)).node_id();
        Ok(self.present)
    }
    /// Undo up to `count` commands. Returns how many were undone.
    pub fn undo_n(
        &mut self,
        count: usize,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<usize, CommandError> {
        let mut undone = 0;
        while undone < count {
            let Some(parent) = self.parent_of(self.present) else {
                break;
            };
            self.step(Step::Undo(self.present), document, observer)?;
            self.present = parent;
            undone += 1;
        }
        Ok(undone)
    }
    /// Redo up to `count` commands, following the most recent branch. Returns how many were redone.
    pub fn redo_n(
        &mut self,
        count: usize,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<usize, CommandError> {
        let mut redone = 0;
        while redone < count {
            let Some(child) = self
                .tree
                .get(self.present)
                .and_then(|node| node.last_child().map(|child| child.node_id()))
            else {
                break;
            };
            self.step(Step::Redo(child), document, observer)?;
            self.present = child;
            redone += 1;
        }
        Ok(redone)
    }
    /// Undo one command. `false` if there was nothing to undo.
    pub fn undo(
        &mut self,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<bool, CommandError> {
        Ok(self.undo_n(1, document, observer)? == 1)
    }
    /// Redo one command. `false` if there was nothing to redo.
    pub fn redo(
        &mut self,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<bool, CommandError> {
        Ok(self.redo_n(1, document, observer)? == 1)
    }
    /// Move the present to any node, possibly on another branch.
    ///
    /// If a command fails midway, the present is left at the last node successfully reached.
    pub fn checkout(
        &mut self,
        target: NodeId,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), HistoryError> {
        for step in path(&self.tree, self.present, target)? {
            self.step(step, document, observer)?;
            self.present = match step {
                Step::Undo(node) => self
                    .parent_of(node)
                    .ok_or(HistoryError::Traverse(TraverseError::NotFound))?,
                Step::Redo(node) => node,
            };
        }
        Ok(())
    }
    #[must_use]
    pub fn present(&self) -> NodeId {
        self.present
    }
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.present != self.root
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.tree
            .get(self.present)
            .is_some_and(|node| node.last_child().is_some())
    }
    /// Remember the present as the saved state.
    pub fn mark_saved(&mut self) {
        log::trace!("Marked {:?} as saved", self.present);
        self.saved = self.present;
    }
    /// Does the document differ from when it was last saved?
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.present != self.saved
    }
    /// Number of commands from the root to the present.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree
            .get(self.present)
            .map_or(0, |node| node.ancestors().count())
    }
    /// Nearest node that is an ancestor of (or equal to) both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Result<NodeId, TraverseError> {
        nearest_ancestor(&self.tree, a, b)
    }
    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.parent().map(|parent| parent.node_id())
    }
    fn step(
        &mut self,
        step: Step,
        document: &mut Document,
        observer: &mut dyn DocumentObserver,
    ) -> Result<(), CommandError> {
        let (node, how) = match step {
            Step::Undo(node) => (node, DoUndo::Undo),
            Step::Redo(node) => (node, DoUndo::Do),
        };
        let mut node = self
            .tree
            .get_mut(node)
            .ok_or(CommandError::MismatchedState)?;
        match node.data() {
            Entry::Command(command) => {
                log::trace!("{} {:?}", how.as_ref(), command);
                command.apply(how, document, observer)
            }
            // Walks never step over the root.
            Entry::Root => Err(CommandError::MismatchedState),
        }
    }
}

#[cfg(test)]
mod test {
    use super::History;
    use crate::{
        color::Color,
        commands::Command,
        geom::{Point, Size},
        state::{Document, LayerPath, Page},
        stroke::Stroke,
    };
    use proptest::prelude::*;

    const A4: Size = Size::new(2100, 2970);
    const AT: LayerPath = LayerPath::new(0, 0);

    fn stroke(n: i32) -> Stroke {
        Stroke::pen(2, Color::BLACK).with_points([Point::new(n, 0), Point::new(n, 10)])
    }
    fn strokes(document: &Document) -> Vec<Stroke> {
        document.normal_layer(AT).unwrap().strokes().to_vec()
    }
    fn started() -> (Document, History) {
        let mut document = Document::new();
        let mut history = History::new();
        history
            .push(Command::insert_page(0, Page::new(A4)), &mut document, &mut ())
            .unwrap();
        (document, history)
    }

    #[test]
    fn undo_redo_linear() {
        let (mut document, mut history) = started();
        for n in 0..3 {
            history
                .push(Command::add_stroke(AT, stroke(n)), &mut document, &mut ())
                .unwrap();
        }
        let after = document.clone();
        assert_eq!(history.depth(), 4);

        assert!(history.undo(&mut document, &mut ()).unwrap());
        assert_eq!(strokes(&document), [stroke(0), stroke(1)]);
        assert_eq!(history.undo_n(2, &mut document, &mut ()).unwrap(), 2);
        assert!(strokes(&document).is_empty());
        assert_eq!(history.redo_n(5, &mut document, &mut ()).unwrap(), 3);
        assert_eq!(document, after);
        assert!(!history.can_redo());

        // Undo past the first command stops at the root.
        assert_eq!(history.undo_n(10, &mut document, &mut ()).unwrap(), 4);
        assert_eq!(document, Document::new());
        assert!(!history.can_undo());
        assert!(!history.undo(&mut document, &mut ()).unwrap());
    }
    #[test]
    fn failed_push_changes_nothing() {
        let (mut document, mut history) = started();
        let present = history.present();
        let (_, command) = history
            .push(Command::remove_stroke(AT), &mut document, &mut ())
            .unwrap_err();
        assert!(!command.holds_entity());
        assert_eq!(history.present(), present);
    }
    #[test]
    fn branches_are_kept() {
        let (mut document, mut history) = started();
        history
            .push(Command::add_stroke(AT, stroke(1)), &mut document, &mut ())
            .unwrap();
        let old_branch = history
            .push(Command::add_stroke(AT, stroke(2)), &mut document, &mut ())
            .unwrap();
        history.undo_n(2, &mut document, &mut ()).unwrap();

        // New branch.
        let new_branch = history
            .push(Command::add_stroke(AT, stroke(9)), &mut document, &mut ())
            .unwrap();
        assert_eq!(strokes(&document), [stroke(9)]);

        history.checkout(old_branch, &mut document, &mut ()).unwrap();
        assert_eq!(strokes(&document), [stroke(1), stroke(2)]);
        assert_eq!(history.present(), old_branch);

        history.checkout(new_branch, &mut document, &mut ()).unwrap();
        assert_eq!(strokes(&document), [stroke(9)]);

        // Redo from the fork follows the most recent branch.
        history.undo(&mut document, &mut ()).unwrap();
        history.redo(&mut document, &mut ()).unwrap();
        assert_eq!(history.present(), new_branch);
    }
    #[test]
    fn modified_tracking() {
        let (mut document, mut history) = started();
        assert!(history.is_modified());
        history.mark_saved();
        assert!(!history.is_modified());
        history
            .push(Command::add_stroke(AT, stroke(1)), &mut document, &mut ())
            .unwrap();
        assert!(history.is_modified());
        history.undo(&mut document, &mut ()).unwrap();
        assert!(!history.is_modified());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Draw(i32),
        Erase,
        NewPage,
        DropPage,
    }
    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..100i32).prop_map(Op::Draw),
            1 => Just(Op::Erase),
            1 => Just(Op::NewPage),
            1 => Just(Op::DropPage),
        ]
    }
    proptest! {
        #[test]
        fn undo_all_restores(ops in proptest::collection::vec(op(), 0..24)) {
            let (mut document, mut history) = started();
            let initial = document.clone();
            let mut pushed = 0;
            for op in ops {
                let command = match op {
                    Op::Draw(n) => Command::add_stroke(AT, stroke(n)),
                    Op::Erase => Command::remove_stroke(AT),
                    Op::NewPage => Command::insert_page(document.page_count(), Page::new(A4)),
                    // Keep page zero, every command above targets it.
                    Op::DropPage if document.page_count() > 1 => Command::delete_page(document.page_count() - 1),
                    Op::DropPage => continue,
                };
                // Invalid ops (erasing an empty layer) are refused without being recorded.
                if history.push(command, &mut document, &mut ()).is_ok() {
                    pushed += 1;
                }
            }
            let finished = document.clone();

            prop_assert_eq!(history.undo_n(pushed, &mut document, &mut ()).unwrap(), pushed);
            prop_assert_eq!(&document, &initial);
            prop_assert_eq!(history.redo_n(pushed, &mut document, &mut ()).unwrap(), pushed);
            prop_assert_eq!(&document, &finished);
        }
    }
}
