use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateLabel {
    Good,
    Regular,
    Bad,
    /// Text the label decoder produced that the catalog doesn't know about.
    Unrecognized(String),
}

impl StateLabel {
    pub fn from_decoded(text: &str) -> Self {
        match text {
            "Bueno" => StateLabel::Good,
            "Regular" => StateLabel::Regular,
            "Malo" => StateLabel::Bad,
            other => StateLabel::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StateLabel::Good => "Bueno",
            StateLabel::Regular => "Regular",
            StateLabel::Bad => "Malo",
            StateLabel::Unrecognized(s) => s,
        }
    }

    pub fn metadata(&self) -> &'static StateMetadata {
        match self {
            StateLabel::Good => &GOOD,
            StateLabel::Bad => &BAD,
            StateLabel::Regular | StateLabel::Unrecognized(_) => &REGULAR,
        }
    }
}

impl Serialize for StateLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMetadata {
    pub color: &'static str,
    #[serde(rename = "icono")]
    pub icon: &'static str,
    #[serde(rename = "descripcion")]
    pub description: &'static str,
    #[serde(rename = "recomendacion")]
    pub recommendation: &'static str,
}

static GOOD: StateMetadata = StateMetadata {
    color: "#10b981",
    icon: "☀️",
    description: "Excelente para turismo",
    recommendation: "Día perfecto para actividades al aire libre",
};

static REGULAR: StateMetadata = StateMetadata {
    color: "#f59e0b",
    icon: "⛅",
    description: "Condiciones aceptables",
    recommendation: "Llevar protección adicional recomendada",
};

static BAD: StateMetadata = StateMetadata {
    color: "#ef4444",
    icon: "🌧️",
    description: "No recomendado para turismo",
    recommendation: "Considere reprogramar actividades al aire libre",
};
