//! Static catalog of predefined business case studies. The catalog is not
//! persisted; only student submissions against it land in the record store.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CaseStudy {
    pub(crate) id: i64,
    pub(crate) title: &'static str,
    pub(crate) level: &'static str,
    pub(crate) domain: &'static str,
    pub(crate) description: &'static str,
    pub(crate) skills: &'static [&'static str],
    pub(crate) duration: &'static str,
}

const CATALOG: &[CaseStudy] = &[
    CaseStudy {
        id: 1,
        title: "Analyse des Ventes E-commerce",
        level: "B1",
        domain: "Retail",
        description: "Analysez les données de ventes d'une boutique en ligne pour identifier les tendances et opportunités.",
        skills: &["Statistique Descriptive", "Pandas", "Visualisation"],
        duration: "2-3 heures",
    },
    CaseStudy {
        id: 2,
        title: "Prédiction du Churn Client",
        level: "B2",
        domain: "Télécommunications",
        description: "Construisez un modèle pour prédire quels clients risquent de quitter l'entreprise.",
        skills: &["Classification", "Feature engineering", "Scikit-learn"],
        duration: "4-6 heures",
    },
    CaseStudy {
        id: 3,
        title: "Segmentation Client (RFM)",
        level: "B2",
        domain: "Marketing",
        description: "Segmentez les clients selon leur comportement d'achat (Récence, Fréquence, Montant).",
        skills: &["Clustering", "SQL", "Analyse exploratoire"],
        duration: "3-4 heures",
    },
    CaseStudy {
        id: 4,
        title: "Dashboard de Pilotage RH",
        level: "B1",
        domain: "Ressources Humaines",
        description: "Créez un tableau de bord interactif pour suivre les KPIs RH.",
        skills: &["Visualisation", "KPIs", "Storytelling"],
        duration: "3-4 heures",
    },
    CaseStudy {
        id: 5,
        title: "Prévision de la Demande",
        level: "B3",
        domain: "Supply Chain",
        description: "Prédisez la demande future pour optimiser les stocks.",
        skills: &["Séries temporelles", "Régression", "Validation"],
        duration: "5-7 heures",
    },
    CaseStudy {
        id: 6,
        title: "Analyse de Sentiment Réseaux Sociaux",
        level: "B3",
        domain: "Marketing Digital",
        description: "Analysez les commentaires clients sur les réseaux sociaux.",
        skills: &["NLP", "Classification", "Nettoyage de texte"],
        duration: "4-5 heures",
    },
];

pub(crate) fn catalog() -> &'static [CaseStudy] {
    CATALOG
}

pub(crate) fn find(id: i64) -> Option<&'static CaseStudy> {
    CATALOG.iter().find(|case| case.id == id)
}

pub(crate) fn filtered(level: Option<&str>, domain: Option<&str>) -> Vec<&'static CaseStudy> {
    CATALOG
        .iter()
        .filter(|case| level.map_or(true, |level| case.level == level))
        .filter(|case| domain.map_or(true, |domain| case.domain == domain))
        .collect()
}
