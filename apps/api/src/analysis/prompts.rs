// Resume analysis prompt and the response schema the model is held to.

use serde_json::{json, Value};

use crate::analysis::models::AnalysisRequest;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub const ANALYSIS_PROMPT_TEMPLATE: &str = "\
Act as an Enterprise-Level ATS Evaluation Engine.
Analyze this resume for the role: {target_role} (Level: {experience_level}).

RESUME TEXT:
{resume_text}

REQUIREMENTS:
- Provide deep semantic analysis.
- Score every numeric field on a 0-100 scale.
- {json_only}";

pub fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{target_role}", request.target_role.trim())
        .replace("{experience_level}", request.experience_level.label())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        // Last, so resume content can never be mistaken for a placeholder.
        .replace("{resume_text}", &request.resume_text)
}

/// Gemini response schema (OpenAPI subset) mirroring `AnalysisResult`.
/// Every property is listed as required.
pub fn analysis_response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let number = json!({ "type": "NUMBER" });
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });

    json!({
        "type": "OBJECT",
        "properties": {
            "atsScore": number,
            "readinessLevel": string,
            "shortlistProbability": string,
            "breakdown": {
                "type": "OBJECT",
                "properties": {
                    "keywordMatch": number,
                    "skillsRelevance": number,
                    "experienceAlignment": number,
                    "projectImpact": number,
                    "structureFormatting": number,
                    "grammarTone": number
                },
                "required": [
                    "keywordMatch", "skillsRelevance", "experienceAlignment",
                    "projectImpact", "structureFormatting", "grammarTone"
                ]
            },
            "companyMatches": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": string,
                        "matchPercentage": number,
                        "status": string,
                        "reason": string
                    },
                    "required": ["name", "matchPercentage", "status", "reason"]
                }
            },
            "strengths": string_list,
            "weaknesses": string_list,
            "summarySuggestion": {
                "type": "OBJECT",
                "properties": {
                    "current": string,
                    "optimized": string
                },
                "required": ["current", "optimized"]
            },
            "skillOptimization": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": string,
                        "skills": string_list
                    },
                    "required": ["category", "skills"]
                }
            },
            "experienceUpgrades": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": string,
                        "upgraded": string,
                        "impactDescription": string
                    },
                    "required": ["original", "upgraded", "impactDescription"]
                }
            },
            "futureSkills": string_list,
            "rejectionRisks": string_list
        },
        "required": [
            "atsScore", "readinessLevel", "shortlistProbability", "breakdown",
            "companyMatches", "strengths", "weaknesses", "summarySuggestion",
            "skillOptimization", "experienceUpgrades", "futureSkills", "rejectionRisks"
        ]
    })
}
