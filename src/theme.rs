use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::grading::PresentationState;

// ---------------------------------------------------------------------------
// Tones: the colour families used for messages and result cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Info,
    Neutral,
}

impl Tone {
    fn hue_saturation(self) -> (f32, f32) {
        match self {
            Tone::Success => (134.0, 0.61),
            Tone::Warning => (45.0, 0.95),
            Tone::Error => (354.0, 0.70),
            Tone::Info => (195.0, 0.75),
            Tone::Neutral => (220.0, 0.10),
        }
    }

    /// Strong colour for text and borders.
    pub fn accent(self) -> Color32 {
        let (hue, saturation) = self.hue_saturation();
        hsl(hue, saturation, 0.40)
    }

    /// Pale background for message boxes.
    pub fn fill(self) -> Color32 {
        let (hue, saturation) = self.hue_saturation();
        hsl(hue, saturation, 0.92)
    }
}

/// Tone of the average box on a result card.
pub fn tone_for(state: &PresentationState) -> Tone {
    match state {
        PresentationState::Passed(_) => Tone::Success,
        PresentationState::NeedsFinal(_) => Tone::Error,
        PresentationState::OneMissing { .. } => Tone::Warning,
        PresentationState::BothMissing => Tone::Error,
        PresentationState::UnknownStatus(_) => Tone::Neutral,
    }
}

fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}
