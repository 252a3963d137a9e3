//! On-demand export artifacts: a standalone portfolio HTML document, CSV
//! renderings of project data, and synthetic CSV datasets for the statistics
//! tools. Everything is produced in memory and handed back as a byte stream;
//! nothing is written server-side.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::models::{Portfolio, PortfolioProject, PortfolioSkill, Project};

pub(crate) fn portfolio_html(
    portfolio: &Portfolio,
    projects: &[PortfolioProject],
    skills: &[PortfolioSkill],
) -> String {
    let name = portfolio.full_name.as_deref().unwrap_or("Portfolio");
    let headline = portfolio.headline.as_deref().unwrap_or("");
    let bio = portfolio.bio.as_deref().unwrap_or("");

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>{name} — Portfolio</title>
<style>
body {{ font-family: 'Segoe UI', sans-serif; max-width: 860px; margin: 2rem auto; color: #1f2430; }}
h1 {{ margin-bottom: 0; }}
.headline {{ color: #5a6472; font-size: 1.1rem; }}
.links a {{ margin-right: 1rem; }}
.project {{ border: 1px solid #dfe3e8; border-radius: 8px; padding: 1rem; margin: 1rem 0; }}
.tech {{ background: #eef2f7; border-radius: 4px; padding: 0.1rem 0.5rem; margin-right: 0.4rem; font-size: 0.85rem; }}
.skill-level {{ color: #5a6472; }}
</style>
</head>
<body>
<h1>{name}</h1>
<p class="headline">{headline}</p>
<p>{bio}</p>
<p class="links">
"#
    );

    if let Some(email) = portfolio.email.as_deref() {
        html.push_str(&format!("<a href=\"mailto:{email}\">{email}</a>\n"));
    }
    if let Some(github) = portfolio.github.as_deref() {
        html.push_str(&format!("<a href=\"https://github.com/{github}\">GitHub</a>\n"));
    }
    if let Some(linkedin) = portfolio.linkedin.as_deref() {
        html.push_str(&format!("<a href=\"https://linkedin.com/in/{linkedin}\">LinkedIn</a>\n"));
    }
    html.push_str("</p>\n");

    if !projects.is_empty() {
        html.push_str("<h2>Projets</h2>\n");
        for project in projects {
            html.push_str(&format!(
                "<div class=\"project\">\n<h3>{}</h3>\n<p>{}</p>\n",
                project.title, project.description
            ));
            for tech in project.technologies.0.iter() {
                html.push_str(&format!("<span class=\"tech\">{tech}</span>"));
            }
            if let Some(results) = project.results.as_deref() {
                html.push_str(&format!("\n<p><strong>Résultats :</strong> {results}</p>"));
            }
            if let Some(github) = project.github.as_deref() {
                html.push_str(&format!("\n<p><a href=\"{github}\">Code</a></p>"));
            }
            html.push_str("\n</div>\n");
        }
    }

    if !skills.is_empty() {
        html.push_str("<h2>Compétences</h2>\n<ul>\n");
        for skill in skills {
            html.push_str(&format!(
                "<li>{} <span class=\"skill-level\">({:?})</span></li>\n",
                skill.skill, skill.level
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub(crate) fn projects_csv(projects: &[Project]) -> String {
    let mut csv = String::from("id,name,kind,status,start_date,end_date,technologies,tasks_done,tasks_total\n");

    for project in projects {
        let technologies = project.technologies.0.join(";");
        let done = project.tasks.0.iter().filter(|task| task.done).count();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            project.id,
            csv_field(&project.name),
            csv_field(&project.kind),
            serde_json::to_value(project.status)
                .ok()
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default(),
            project.start_date.map(|date| date.to_string()).unwrap_or_default(),
            project.end_date.map(|date| date.to_string()).unwrap_or_default(),
            csv_field(&technologies),
            done,
            project.tasks.0.len(),
        ));
    }

    csv
}

/// Synthetic dataset for the statistics visualizers: one normal column
/// (Box–Muller) and one uniform column. A fixed seed gives reproducible
/// sheets for worked examples.
pub(crate) fn synthetic_dataset_csv(rows: usize, seed: Option<u64>) -> String {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut csv = String::from("observation,normal,uniform\n");
    for index in 0..rows {
        let normal = sample_standard_normal(&mut rng);
        let uniform: f64 = rng.gen_range(0.0..100.0);
        csv.push_str(&format!("{},{:.4},{:.4}\n", index + 1, normal, uniform));
    }

    csv
}

fn sample_standard_normal(rng: &mut StdRng) -> f64 {
    // Box–Muller transform over two uniforms in (0, 1].
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
