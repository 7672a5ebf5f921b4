//! An open document: its model, its undo tree, and the render cache of the page on screen.

use std::time::Instant;

use scrawl_core::{
    commands::{Command, CommandError},
    geom::Point,
    history::{History, HistoryError, NodeId},
    state::{Document, LayerPath, ModelError},
    stroke::Stroke,
};

use crate::{
    renderer::{DamageRect, PageRenderer, RenderError, Target},
    settings::Settings,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no page is shown")]
    NoPage,
}

/// Where a live stroke ends up once finished.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StrokeMode {
    /// Committed to a layer of the shown page through the undo history.
    Permanent { layer: usize },
    /// Put on the shown page's temporary layer, and removed after the fading timeout.
    Fading,
}

#[derive(Debug)]
pub struct Session {
    document: Document,
    history: History,
    renderer: Option<PageRenderer>,
    settings: Settings,
}
impl Session {
    /// Open a document. No page is shown until [`Self::show_page`].
    #[must_use]
    pub fn new(document: Document, settings: Settings) -> Self {
        Self {
            document,
            history: History::new(),
            renderer: None,
            settings,
        }
    }
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
    #[must_use]
    pub fn renderer(&self) -> Option<&PageRenderer> {
        self.renderer.as_ref()
    }
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    /// Close the session, handing back the document as it currently is.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Apply a command and make it the newest entry in the history.
    pub fn push(&mut self, command: Command) -> Result<NodeId, SessionError> {
        self.cancel_stroke();
        self.history
            .push(command, &mut self.document, &mut self.renderer)
            .map_err(|(err, command)| {
                log::error!("Command refused: {err}\n{command:#?}");
                err.into()
            })
    }
    /// Undo one command. `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        self.cancel_stroke();
        Ok(self.history.undo(&mut self.document, &mut self.renderer)?)
    }
    /// Redo one command along the newest branch. `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        self.cancel_stroke();
        Ok(self.history.redo(&mut self.document, &mut self.renderer)?)
    }
    /// Jump to any point in the history.
    pub fn checkout(&mut self, node: NodeId) -> Result<(), SessionError> {
        self.cancel_stroke();
        Ok(self
            .history
            .checkout(node, &mut self.document, &mut self.renderer)?)
    }
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.history.is_modified()
    }

    /// Show page `page` in a `viewport` sized view.
    pub fn show_page(&mut self, page: usize, viewport: [u32; 2]) -> Result<(), SessionError> {
        self.cancel_stroke();
        match &mut self.renderer {
            Some(renderer) => {
                if renderer.viewport() != viewport {
                    // Checked first so a bad viewport leaves the old page up.
                    crate::view_transform::ViewTransform::fit(
                        self.document
                            .page(page)
                            .ok_or(RenderError::NoSuchPage(page))?
                            .size(),
                        viewport,
                        self.settings.render().viewport_margin,
                        self.settings.render().min_viewport,
                    )
                    .map_err(RenderError::from)?;
                }
                renderer.show(&self.document, page)?;
                if renderer.viewport() != viewport {
                    renderer.resize(&self.document, viewport)?;
                }
            }
            None => {
                self.renderer = Some(PageRenderer::new(
                    &self.document,
                    page,
                    viewport,
                    self.settings.render(),
                )?);
            }
        }
        Ok(())
    }
    /// Stop rendering entirely.
    pub fn hide_page(&mut self) {
        self.renderer = None;
    }
    pub fn resize(&mut self, viewport: [u32; 2]) -> Result<(), SessionError> {
        let renderer = self.renderer.as_mut().ok_or(SessionError::NoPage)?;
        renderer.resize(&self.document, viewport)?;
        Ok(())
    }
    /// Everything repainted since the last call, in device pixels.
    pub fn take_damage(&mut self) -> Vec<DamageRect> {
        self.renderer
            .as_mut()
            .map_or_else(Vec::new, PageRenderer::take_damage)
    }

    /// Start drawing on the shown page. Any stroke already in progress is cancelled.
    pub fn begin_stroke(&mut self, mode: StrokeMode, stroke: Stroke) -> Result<(), SessionError> {
        self.cancel_stroke();
        let renderer = self.renderer.as_mut().ok_or(SessionError::NoPage)?;
        let page = renderer.page().ok_or(SessionError::NoPage)?;
        let target = match mode {
            StrokeMode::Permanent { layer } => {
                self.document.normal_layer(LayerPath::new(page, layer))?;
                Target::Layer(layer)
            }
            StrokeMode::Fading => Target::Temporary,
        };
        renderer.begin_stroke(target, stroke)?;
        Ok(())
    }
    /// Add a point, in page units, to the stroke in progress.
    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(renderer) = &mut self.renderer {
            renderer.extend_stroke(point);
        }
    }
    /// Commit the stroke in progress. Permanent strokes become an undoable command, fading ones
    /// start their countdown from `now`.
    pub fn finish_stroke(&mut self, now: Instant) -> Result<(), SessionError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let (Some(page), Some((target, stroke))) = (renderer.page(), renderer.finish_stroke())
        else {
            return Ok(());
        };
        if stroke.is_empty() {
            renderer.abandon(&self.document);
            return Ok(());
        }
        let result = match target {
            Target::Layer(layer) => self
                .history
                .push(
                    Command::add_stroke(LayerPath::new(page, layer), stroke),
                    &mut self.document,
                    &mut self.renderer,
                )
                .map(|_| ())
                .map_err(|(err, _)| SessionError::from(err)),
            Target::Temporary => self
                .document
                .add_fading_stroke(
                    page,
                    stroke,
                    now,
                    self.settings.fading_timeout(),
                    &mut self.renderer,
                )
                .map_err(SessionError::from),
        };
        if let Err(err) = &result {
            log::error!("Finished stroke could not be committed: {err}");
            if let Some(renderer) = &mut self.renderer {
                renderer.abandon(&self.document);
            }
        }
        result
    }
    pub fn cancel_stroke(&mut self) {
        if let Some(renderer) = &mut self.renderer {
            renderer.cancel_stroke(&self.document);
        }
    }
    /// Remove fading strokes whose time is up. Returns how many were removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.document.expire_fading(now, &mut self.renderer)
    }
    /// When [`Self::tick`] next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.document.next_fading_deadline()
    }
}
