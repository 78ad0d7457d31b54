use serde::{Deserialize, Serialize};

/// Seniority the resume is judged against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    #[default]
    Fresher,
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Fresher,
        ExperienceLevel::Junior,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
    ];

    /// Human-readable label, as shown in the selector and sent in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "Fresher",
            ExperienceLevel::Junior => "Junior (1-3 years)",
            ExperienceLevel::MidLevel => "Mid-Level (3-6 years)",
            ExperienceLevel::Senior => "Senior (6+ years)",
        }
    }
}

/// One submission to the analysis engine. Built fresh per submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub target_role: String,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
}

/// Per-category sub-scores, each 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub skills_relevance: f64,
    pub experience_alignment: f64,
    pub project_impact: f64,
    pub structure_formatting: f64,
    pub grammar_tone: f64,
}

impl ScoreBreakdown {
    /// `(camelCase key, score)` pairs in wire order.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("keywordMatch", self.keyword_match),
            ("skillsRelevance", self.skills_relevance),
            ("experienceAlignment", self.experience_alignment),
            ("projectImpact", self.project_impact),
            ("structureFormatting", self.structure_formatting),
            ("grammarTone", self.grammar_tone),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMatch {
    pub name: String,
    pub match_percentage: f64,
    pub status: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySuggestion {
    pub current: String,
    pub optimized: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceUpgrade {
    pub original: String,
    pub upgraded: String,
    pub impact_description: String,
}

/// Full evaluation returned by the analysis engine. Every field is required;
/// a reply missing any of them is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ats_score: f64,
    pub readiness_level: String,
    pub shortlist_probability: String,
    pub breakdown: ScoreBreakdown,
    pub company_matches: Vec<CompanyMatch>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary_suggestion: SummarySuggestion,
    pub skill_optimization: Vec<SkillCategory>,
    pub experience_upgrades: Vec<ExperienceUpgrade>,
    pub future_skills: Vec<String>,
    pub rejection_risks: Vec<String>,
}

impl AnalysisResult {
    /// Checks every numeric score lies in 0–100. Returns the offending field on failure.
    pub fn validate_scores(&self) -> Result<(), String> {
        check_score("atsScore", self.ats_score)?;
        for (key, score) in self.breakdown.entries() {
            check_score(&format!("breakdown.{key}"), score)?;
        }
        for (i, company) in self.company_matches.iter().enumerate() {
            check_score(
                &format!("companyMatches[{i}].matchPercentage"),
                company.match_percentage,
            )?;
        }
        Ok(())
    }
}

fn check_score(field: &str, score: f64) -> Result<(), String> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("{field} must be between 0 and 100, got {score}"))
    }
}
