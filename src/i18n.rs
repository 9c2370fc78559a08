//! Display strings for the supported languages.
//!
//! Catalog entries and screens only carry display keys; the front end
//! resolves them here against the active [`Language`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    /// All supported languages, in toggle order.
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// ISO 639-1 code stored in the preferences.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::English),
            "es" => Ok(Self::Spanish),
            other => Err(ConfigError::InvalidValue {
                key: "language".to_string(),
                message: format!("unsupported language code '{other}' (expected en or es)"),
            }),
        }
    }
}

static ENGLISH: &[(&str, &str)] = &[
    ("app_name", "TaskOne"),
    ("home_title", "Welcome to TaskOne"),
    ("home_start_onboarding", "Get started"),
    ("home_language", "Language"),
    ("home_onboarding_done", "You're all set. Your plan is ready."),
    ("button_continue", "Continue"),
    ("button_back", "Back"),
    ("onboarding_skill_title", "Which skill do you want to improve first?"),
    ("onboarding_skill_pronunciation", "Pronunciation"),
    ("onboarding_skill_confident_speaking", "Confident speaking"),
    ("onboarding_skill_vocabulary", "Vocabulary"),
    ("onboarding_skill_listening", "Listening"),
    ("onboarding_skill_grammar", "Grammar"),
    ("onboarding_skill_writing", "Writing"),
    ("onboarding_skill_reading", "Reading"),
    ("onboarding_goal_title", "How much time will you practice each day?"),
    ("onboarding_goal_option_5_min", "5 min / day"),
    ("onboarding_goal_option_10_min", "10 min / day"),
    ("onboarding_goal_option_15_min", "15 min / day"),
    ("onboarding_goal_option_30_min", "30 min / day"),
    ("onboarding_review_title", "Learners love practicing with us"),
    (
        "onboarding_review_anna_comment",
        "I finally feel comfortable speaking at work.",
    ),
    (
        "onboarding_review_safi_comment",
        "Ten minutes a day made a real difference in a month.",
    ),
    (
        "onboarding_review_marek_comment",
        "The topics match exactly what I need for travelling.",
    ),
    ("onboarding_topics_title", "Pick the topics you want to talk about"),
    ("onboarding_topic_restaurant", "Restaurant"),
    ("onboarding_topic_airport", "Airport"),
    ("onboarding_topic_business", "Business"),
    ("onboarding_topic_job_interview", "Job interview"),
    ("onboarding_topic_doctor", "Doctor"),
    ("onboarding_topic_relationship", "Relationship"),
    ("onboarding_topic_travel", "Travel"),
    ("onboarding_topic_school", "School"),
];

static SPANISH: &[(&str, &str)] = &[
    ("home_title", "Bienvenido a TaskOne"),
    ("home_start_onboarding", "Comenzar"),
    ("home_language", "Idioma"),
    ("home_onboarding_done", "Todo listo. Tu plan está preparado."),
    ("button_continue", "Continuar"),
    ("button_back", "Atrás"),
    ("onboarding_skill_title", "¿Qué habilidad quieres mejorar primero?"),
    ("onboarding_skill_pronunciation", "Pronunciación"),
    ("onboarding_skill_confident_speaking", "Hablar con confianza"),
    ("onboarding_skill_vocabulary", "Vocabulario"),
    ("onboarding_skill_listening", "Comprensión auditiva"),
    ("onboarding_skill_grammar", "Gramática"),
    ("onboarding_skill_writing", "Escritura"),
    ("onboarding_skill_reading", "Lectura"),
    ("onboarding_goal_title", "¿Cuánto tiempo practicarás cada día?"),
    ("onboarding_goal_option_5_min", "5 min / día"),
    ("onboarding_goal_option_10_min", "10 min / día"),
    ("onboarding_goal_option_15_min", "15 min / día"),
    ("onboarding_goal_option_30_min", "30 min / día"),
    ("onboarding_review_title", "A nuestros estudiantes les encanta practicar"),
    (
        "onboarding_review_anna_comment",
        "Por fin me siento cómoda hablando en el trabajo.",
    ),
    (
        "onboarding_review_safi_comment",
        "Diez minutos al día marcaron la diferencia en un mes.",
    ),
    (
        "onboarding_review_marek_comment",
        "Los temas son justo lo que necesito para viajar.",
    ),
    ("onboarding_topics_title", "Elige los temas de los que quieres hablar"),
    ("onboarding_topic_restaurant", "Restaurante"),
    ("onboarding_topic_airport", "Aeropuerto"),
    ("onboarding_topic_business", "Negocios"),
    ("onboarding_topic_job_interview", "Entrevista de trabajo"),
    ("onboarding_topic_doctor", "Médico"),
    ("onboarding_topic_relationship", "Relaciones"),
    ("onboarding_topic_travel", "Viajes"),
    ("onboarding_topic_school", "Escuela"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Resolve a display key for `language`.
///
/// Falls back to English, then to the key itself.
pub fn translate<'a>(key: &'a str, language: Language) -> &'a str {
    let table = match language {
        Language::English => ENGLISH,
        Language::Spanish => SPANISH,
    };
    lookup(table, key)
        .or_else(|| lookup(ENGLISH, key))
        .unwrap_or(key)
}
