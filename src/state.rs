use std::sync::Arc;

use crate::session::{GradeService, RenderModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Registry and cached loader, shared by every request.
    pub service: Arc<GradeService>,

    /// Selected class label (None while the sentinel is shown).
    pub selected_class: Option<String>,

    /// Identifier text as typed.
    pub identifier: String,

    /// Outcome of selecting the class (load status / timestamp).
    pub class_view: RenderModel,

    /// Outcome of the last submitted lookup, if any.
    pub lookup_view: Option<RenderModel>,

    /// One-shot notice shown after the cache was cleared.
    pub notice: Option<RenderModel>,
}

impl AppState {
    pub fn new(service: Arc<GradeService>) -> Self {
        Self {
            service,
            selected_class: None,
            identifier: String::new(),
            class_view: RenderModel::SelectClass,
            lookup_view: None,
            notice: None,
        }
    }

    /// Switch class; a new selection supersedes any previous result.
    pub fn select_class(&mut self, label: Option<String>) {
        self.selected_class = label;
        self.lookup_view = None;
        self.notice = None;
        self.class_view = self.service.select(self.selected_class.as_deref());
    }

    /// Run the lookup for the typed identifier.
    pub fn submit(&mut self) {
        let model = self
            .service
            .lookup(self.selected_class.as_deref(), &self.identifier);
        self.notice = None;
        self.lookup_view = Some(model);
    }

    /// Clear every cached sheet and reload the selected class.
    pub fn refresh(&mut self) {
        self.notice = Some(self.service.refresh());
        self.lookup_view = None;
        self.class_view = self.service.select(self.selected_class.as_deref());
    }

    /// Whether the class sheet loaded and the identifier form can be used.
    pub fn class_ready(&self) -> bool {
        matches!(self.class_view, RenderModel::ClassLoaded { .. })
    }
}
