use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::columns::ColumnCategory;
use crate::grading::{Assessment, PresentationState, Scores, PASSING_AVERAGE};
use crate::session::{RenderModel, StudentResult};
use crate::theme::{tone_for, Tone};

/// Timestamp format shown next to loaded data.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y às %H:%M:%S";

// ---------------------------------------------------------------------------
// Message boxes
// ---------------------------------------------------------------------------

/// A coloured message box.
pub fn message(ui: &mut Ui, tone: Tone, text: &str) {
    egui::Frame::group(ui.style())
        .fill(tone.fill())
        .stroke(egui::Stroke::new(1.0, tone.accent()))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(text).color(tone.accent()).strong());
        });
}

/// Tone and text for every render model that is a plain message.
pub fn describe(model: &RenderModel) -> Option<(Tone, String)> {
    let described = match model {
        RenderModel::SelectClass => (
            Tone::Info,
            "👆 Selecione sua turma acima para começar a consulta.".to_string(),
        ),
        RenderModel::Unavailable { .. } => (
            Tone::Warning,
            "⚠️ Dados desta turma ainda não estão disponíveis. Por favor, selecione outra turma."
                .to_string(),
        ),
        RenderModel::ClassLoaded {
            label, fetched_at, ..
        } => (
            Tone::Success,
            format!(
                "✅ Dados da turma {label} carregados! 🕐 {}",
                fetched_at.format(TIMESTAMP_FORMAT)
            ),
        ),
        RenderModel::LoadFailed { message } => {
            (Tone::Error, format!("❌ Erro ao carregar os dados: {message}"))
        }
        RenderModel::MissingClassColumn => (
            Tone::Error,
            "❌ Coluna 'TURMA' não encontrada na planilha!".to_string(),
        ),
        RenderModel::ColumnsUnresolved { missing, available } => (
            Tone::Error,
            format!(
                "❌ Erro: colunas não encontradas ({}). Colunas disponíveis: {available:?}",
                join(missing)
            ),
        ),
        RenderModel::EmptyIdentifier => (
            Tone::Warning,
            "⚠️ Por favor, digite sua matrícula.".to_string(),
        ),
        RenderModel::InvalidIdentifier { .. } => (
            Tone::Error,
            "❌ Por favor, digite apenas números na matrícula.".to_string(),
        ),
        RenderModel::NotFound { .. } => (
            Tone::Error,
            "❌ Matrícula não encontrada. Verifique se digitou corretamente.".to_string(),
        ),
        RenderModel::CacheCleared => (
            Tone::Success,
            "✅ Cache limpo! Os dados serão atualizados.".to_string(),
        ),
        RenderModel::Found(_) => return None,
    };
    Some(described)
}

fn join(categories: &[ColumnCategory]) -> String {
    categories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the outcome of selecting a class.
pub fn class_status(ui: &mut Ui, model: &RenderModel) {
    if let Some((tone, text)) = describe(model) {
        message(ui, tone, &text);
    }
}

/// Render the outcome of a lookup.
pub fn lookup_result(ui: &mut Ui, model: &RenderModel) {
    match model {
        RenderModel::Found(result) => student_card(ui, result),
        other => class_status(ui, other),
    }
}

// ---------------------------------------------------------------------------
// Result card
// ---------------------------------------------------------------------------

/// Follow-up messages shown under a result card.
pub fn status_messages(state: &PresentationState) -> Vec<(Tone, String)> {
    match state {
        PresentationState::BothMissing => vec![
            (Tone::Error, "⚠️ Você não fez nenhuma das avaliações!".to_string()),
            (
                Tone::Warning,
                "📞 Procure seu professor ou coordenador do curso para verificar sua situação."
                    .to_string(),
            ),
        ],
        PresentationState::OneMissing { missing, .. } => vec![
            (
                Tone::Warning,
                format!("⚠️ Você não fez a {}.", assessment_title(*missing)),
            ),
            (
                Tone::Info,
                "📞 Procure seu professor ou coordenador do curso.".to_string(),
            ),
        ],
        PresentationState::Passed(_) => vec![(
            Tone::Success,
            "🎉 Você está APROVADO! Parabéns!".to_string(),
        )],
        PresentationState::NeedsFinal(_) => vec![
            (
                Tone::Warning,
                "⚠️ Você precisará fazer a PROVA FINAL (AF).".to_string(),
            ),
            (
                Tone::Info,
                format!(
                    "💡 Dica: a nota mínima para aprovação direta é {PASSING_AVERAGE:.1}. Na prova final, você precisará atingir a média necessária para aprovação."
                ),
            ),
        ],
        PresentationState::UnknownStatus(_) => Vec::new(),
    }
}

fn assessment_title(which: Assessment) -> &'static str {
    match which {
        Assessment::First => "Avaliação 01 (AV_01)",
        Assessment::Second => "Avaliação 02 (AV_02)",
    }
}

fn student_card(ui: &mut Ui, result: &StudentResult) {
    message(ui, Tone::Success, "✅ Aluno encontrado!");
    ui.add_space(6.0);
    ui.heading(format!("👤 {}", result.name));
    ui.label(format!("Matrícula: {}", result.id));
    ui.label(
        RichText::new(format!(
            "{} · dados de {}",
            result.class_label,
            result.fetched_at.format(TIMESTAMP_FORMAT)
        ))
        .weak(),
    );
    ui.separator();

    let tone = tone_for(&result.state);
    match &result.state {
        PresentationState::BothMissing => {}
        PresentationState::OneMissing { missing, shown } => {
            let present = match missing {
                Assessment::First => "📝 Avaliação 02",
                Assessment::Second => "📝 Avaliação 01",
            };
            ui.horizontal(|ui: &mut Ui| score_box(ui, present, shown, Tone::Neutral));
        }
        PresentationState::Passed(scores)
        | PresentationState::NeedsFinal(scores)
        | PresentationState::UnknownStatus(scores) => {
            scores_row(ui, scores, tone, &result.state);
        }
    }

    ui.add_space(8.0);
    for (tone, text) in status_messages(&result.state) {
        message(ui, tone, &text);
    }
}

fn scores_row(ui: &mut Ui, scores: &Scores, average_tone: Tone, state: &PresentationState) {
    let average_label = match state {
        PresentationState::Passed(_) => "🎉 MÉDIA",
        PresentationState::NeedsFinal(_) => "⚠️ MÉDIA",
        _ => "📊 MÉDIA",
    };
    ui.columns(3, |cols| {
        score_box(&mut cols[0], "📝 Avaliação 01", &scores.score1, Tone::Neutral);
        score_box(&mut cols[1], "📝 Avaliação 02", &scores.score2, Tone::Neutral);
        score_box(&mut cols[2], average_label, &scores.average, average_tone);
    });
}

fn score_box(ui: &mut Ui, label: &str, value: &str, tone: Tone) {
    let (fill, text) = match tone {
        Tone::Neutral => (tone.fill(), Color32::DARK_GRAY),
        _ => (tone.accent(), Color32::WHITE),
    };
    egui::Frame::group(ui.style())
        .fill(fill)
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(140.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(label).color(text));
                ui.label(RichText::new(value).color(text).size(32.0).strong());
            });
        });
}
