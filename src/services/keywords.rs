//! Keyword extraction for uploaded course material.
//!
//! A fixed data-science vocabulary is scanned against the lowercased text;
//! no model call is involved. First occurrence wins, capped at ten terms.

const MAX_KEYWORDS: usize = 10;

const VOCABULARY: &[&str] = &[
    "moyenne",
    "médiane",
    "écart-type",
    "variance",
    "corrélation",
    "probabilité",
    "loi normale",
    "distribution",
    "échantillon",
    "régression",
    "classification",
    "clustering",
    "modèle",
    "python",
    "pandas",
    "numpy",
    "matplotlib",
    "sql",
    "algorithme",
    "fonction",
    "variable",
    "tableau",
    "boucle",
    "test",
    "hypothèse",
    "p-value",
    "significativité",
];

pub(crate) fn extract(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    VOCABULARY
        .iter()
        .filter(|term| lowered.contains(*term))
        .take(MAX_KEYWORDS)
        .map(|term| term.to_string())
        .collect()
}
