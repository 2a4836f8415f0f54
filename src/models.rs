//! Model-id based capability classification and icon lookup.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Color-reproduction capability class of a light.
///
/// The three gamuts denote the distinct color ranges of the hardware
/// generations; `Temperature` is white-balance-only and `None` has no color
/// control at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ColorType {
    None,
    Temperature,
    GamutA,
    GamutB,
    GamutC,
}

/// Known model families, evaluated first-match-wins.
///
/// Exact model ids only: the `LCT`/`LLC`/`LST` prefixes span multiple gamut
/// generations, so prefix matching would be ambiguous. Unknown ids classify
/// as [`ColorType::None`].
const MODEL_COLOR_TYPES: &[(&str, ColorType)] = &[
    // Gamut B (first generation hue bulbs)
    ("LCT001", ColorType::GamutB),
    ("LCT002", ColorType::GamutB),
    ("LCT003", ColorType::GamutB),
    ("LCT007", ColorType::GamutB),
    ("LLM001", ColorType::GamutB),
    // Gamut C (richer greens/blues)
    ("LCT010", ColorType::GamutC),
    ("LCT011", ColorType::GamutC),
    ("LCT012", ColorType::GamutC),
    ("LCT014", ColorType::GamutC),
    ("LLC020", ColorType::GamutC),
    ("LST002", ColorType::GamutC),
    // Gamut A (friends-of-hue lamps and the first lightstrip)
    ("LST001", ColorType::GamutA),
    ("LLC005", ColorType::GamutA),
    ("LLC006", ColorType::GamutA),
    ("LLC007", ColorType::GamutA),
    ("LLC010", ColorType::GamutA),
    ("LLC011", ColorType::GamutA),
    ("LLC012", ColorType::GamutA),
    ("LLC013", ColorType::GamutA),
    ("LLC014", ColorType::GamutA),
    // Color temperature only
    ("LTW001", ColorType::Temperature),
    ("LTW004", ColorType::Temperature),
    ("LTW010", ColorType::Temperature),
    ("LTW011", ColorType::Temperature),
    ("LTW012", ColorType::Temperature),
    ("LTW013", ColorType::Temperature),
    ("LTW015", ColorType::Temperature),
    ("LLM010", ColorType::Temperature),
    ("LLM011", ColorType::Temperature),
    ("LLM012", ColorType::Temperature),
    // Dimmable white, no color control
    ("LWB004", ColorType::None),
    ("LWB006", ColorType::None),
    ("LWB007", ColorType::None),
    ("LWB010", ColorType::None),
    ("LWB014", ColorType::None),
];

impl ColorType {
    /// Classify a model id. Computed once per light at construction.
    pub fn classify(model_id: &str) -> Self {
        MODEL_COLOR_TYPES
            .iter()
            .find(|(model, _)| *model == model_id)
            .map(|(_, color_type)| *color_type)
            .unwrap_or(ColorType::None)
    }
}

/// Icon asset name for a model id, `""` for unknown models.
pub fn picture_of_model(model_id: &str) -> &'static str {
    match model_id {
        "LCT001" | "LCT007" | "LCT010" | "LCT014" | "LTW001" | "LTW004" | "LTW010"
        | "LTW015" | "LWB004" | "LWB006" => "e27_waca",
        "LWB010" | "LWB014" => "e27_white",
        "LCT012" | "LTW012" => "e14",
        "LCT002" => "br30",
        "LCT011" | "LTW011" => "br30_slim",
        "LCT003" => "gu10",
        "LTW013" => "gu10_perfectfit",
        "LST001" | "LST002" => "lightstrip",
        "LLC006" | "LLC010" => "iris",
        "LLC005" | "LLC011" | "LLC012" | "LLC007" => "bloom",
        "LLC014" => "aura",
        "LLC013" => "storylight",
        "LLC020" => "go",
        "LLM001" | "LLM010" | "LLM011" | "LLM012" => "module",
        _ => "",
    }
}
