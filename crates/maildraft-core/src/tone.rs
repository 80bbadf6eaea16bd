/// Sampling temperature used when the tone label is not one of the known four.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
    Professional,
    Informal,
    Friendly,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Professional => "professional",
            Tone::Informal => "informal",
            Tone::Friendly => "friendly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "formal" => Some(Tone::Formal),
            "professional" => Some(Tone::Professional),
            "informal" => Some(Tone::Informal),
            "friendly" => Some(Tone::Friendly),
            _ => None,
        }
    }

    pub fn all() -> Vec<Tone> {
        vec![Tone::Formal, Tone::Professional, Tone::Informal, Tone::Friendly]
    }

    /// Next option in selector order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Tone::Formal => Tone::Professional,
            Tone::Professional => Tone::Informal,
            Tone::Informal => Tone::Friendly,
            Tone::Friendly => Tone::Formal,
        }
    }

    /// Previous option in selector order, wrapping around
    pub fn prev(&self) -> Self {
        match self {
            Tone::Formal => Tone::Friendly,
            Tone::Professional => Tone::Formal,
            Tone::Informal => Tone::Professional,
            Tone::Friendly => Tone::Informal,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Tone::Formal => 0.4,
            Tone::Professional => 0.5,
            Tone::Informal => 0.6,
            Tone::Friendly => 0.7,
        }
    }
}

/// Look up the sampling temperature for a raw tone label.
///
/// Only the exact selector labels are recognised; anything else (including
/// differently-cased labels arriving from the command line) gets
/// [`DEFAULT_TEMPERATURE`].
pub fn temperature_for(tone: &str) -> f32 {
    match tone {
        "formal" => Tone::Formal.temperature(),
        "professional" => Tone::Professional.temperature(),
        "informal" => Tone::Informal.temperature(),
        "friendly" => Tone::Friendly.temperature(),
        _ => DEFAULT_TEMPERATURE,
    }
}
