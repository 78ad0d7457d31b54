//! Printable analysis report, rendered as Markdown.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::analysis::models::AnalysisResult;

pub fn render_report(analysis: &AnalysisResult, generated_on: NaiveDate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, analysis, generated_on);
    out
}

fn write_report(
    out: &mut String,
    a: &AnalysisResult,
    generated_on: NaiveDate,
) -> std::fmt::Result {
    writeln!(out, "# Enterprise ATS Resume Analysis Report")?;
    writeln!(out)?;
    writeln!(out, "Generated on {}", generated_on.format("%Y-%m-%d"))?;
    writeln!(out)?;

    writeln!(out, "## Overall ATS Score: {}%", format_score(a.ats_score))?;
    writeln!(out)?;
    writeln!(out, "- **Readiness Level:** {}", a.readiness_level)?;
    writeln!(out, "- **Shortlist Probability:** {}", a.shortlist_probability)?;

    section(out, "Score Breakdown")?;
    for (key, score) in a.breakdown.entries() {
        writeln!(out, "- {}: {}%", humanize_key(key), format_score(score))?;
    }

    section(out, "Company Matches")?;
    for company in &a.company_matches {
        writeln!(
            out,
            "- **{}** - {}% ({})",
            company.name,
            format_score(company.match_percentage),
            company.status
        )?;
        writeln!(out, "  {}", company.reason)?;
    }

    bullet_section(out, "Strengths", &a.strengths)?;
    bullet_section(out, "Areas for Improvement", &a.weaknesses)?;

    section(out, "Summary Optimization")?;
    writeln!(out, "**Current Summary:**")?;
    writeln!(out)?;
    writeln!(out, "{}", a.summary_suggestion.current)?;
    writeln!(out)?;
    writeln!(out, "**Optimized Summary:**")?;
    writeln!(out)?;
    writeln!(out, "{}", a.summary_suggestion.optimized)?;

    section(out, "Skill Optimization")?;
    for category in &a.skill_optimization {
        writeln!(out, "- **{}:** {}", category.category, category.skills.join(", "))?;
    }

    section(out, "Experience Upgrades")?;
    for upgrade in &a.experience_upgrades {
        writeln!(out, "- Original: {}", upgrade.original)?;
        writeln!(out, "  Upgraded: {}", upgrade.upgraded)?;
        writeln!(out, "  _{}_", upgrade.impact_description)?;
    }

    bullet_section(out, "Future Skills to Develop", &a.future_skills)?;
    bullet_section(out, "Rejection Risks", &a.rejection_risks)?;
    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "### {title}")?;
    writeln!(out)
}

fn bullet_section(out: &mut String, title: &str, items: &[String]) -> std::fmt::Result {
    section(out, title)?;
    for item in items {
        writeln!(out, "- {item}")?;
    }
    Ok(())
}

/// `structureFormatting` → `Structure Formatting`.
fn humanize_key(key: &str) -> String {
    let mut words = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            words.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            words.push(' ');
            words.push(ch);
        } else {
            words.push(ch);
        }
    }
    words
}

/// Whole scores print without a trailing `.0`.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
