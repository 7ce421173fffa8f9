use eframe::egui::{self, Key, RichText, Ui};

use crate::state::AppState;
use crate::ui::result;

/// Text of the selector entry that means "no class chosen".
pub const NO_CLASS: &str = "Selecione uma opção...";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title row with the refresh action.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("📚 Sistema de Consulta de Notas");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui
                .button("🔄 Atualizar Dados")
                .on_hover_text("Clique para buscar as notas mais recentes")
                .clicked()
            {
                state.refresh();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Central panel – class selector, identifier form and results
// ---------------------------------------------------------------------------

/// Render the lookup form and whatever the last request produced.
pub fn lookup_panel(ui: &mut Ui, state: &mut AppState) {
    if let Some(notice) = &state.notice {
        result::class_status(ui, notice);
        ui.add_space(8.0);
    }

    class_selector(ui, state);
    ui.add_space(8.0);
    result::class_status(ui, &state.class_view);

    if !state.class_ready() {
        return;
    }

    ui.add_space(12.0);
    ui.label(RichText::new("🔑 Digite sua matrícula:").strong().size(16.0));
    let mut submitted = false;
    ui.horizontal(|ui: &mut Ui| {
        let width = ui.available_width() - 120.0;
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.identifier)
                .hint_text("Digite sua matrícula (ex: 1234567)")
                .desired_width(width),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            submitted = true;
        }
        if ui.button("🔍 Consultar").clicked() {
            submitted = true;
        }
    });
    if submitted {
        state.submit();
    }

    if let Some(view) = &state.lookup_view {
        ui.add_space(12.0);
        result::lookup_result(ui, view);
    }
}

fn class_selector(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🎓 Selecione sua turma:").strong().size(16.0));

    let labels: Vec<String> = state
        .service
        .registry()
        .labels()
        .map(str::to_string)
        .collect();
    let current = state.selected_class.clone();
    let mut picked: Option<Option<String>> = None;

    egui::ComboBox::from_id_salt("class_selector")
        .selected_text(current.as_deref().unwrap_or(NO_CLASS))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), NO_CLASS).clicked() {
                picked = Some(None);
            }
            for label in &labels {
                if ui
                    .selectable_label(current.as_deref() == Some(label), label)
                    .clicked()
                {
                    picked = Some(Some(label.clone()));
                }
            }
        });

    if let Some(choice) = picked {
        if choice != current {
            log::info!("Class selected: {choice:?}");
            state.select_class(choice);
        }
    }
}
