use std::sync::Arc;

use eframe::egui;

use crate::session::GradeService;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GradeLookupApp {
    pub state: AppState,
}

impl GradeLookupApp {
    pub fn new(service: Arc<GradeService>) -> Self {
        Self {
            state: AppState::new(service),
        }
    }
}

impl eframe::App for GradeLookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and refresh ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: lookup form and result ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::lookup_panel(ui, &mut self.state);
                });
        });
    }
}
