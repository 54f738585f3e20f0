// Job matching prompt templates.

pub const JOB_MATCH_SYSTEM: &str =
    "You are a job matching expert. Always return valid JSON only.";

pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert job matching system. Compare the candidate's skills with the job requirements.

USER'S SKILLS:
{user_skills}

JOB DESCRIPTION:
{job_description}

Analyze and return a JSON object with:
{
  "match_score": <number 0-100>,
  "matching_skills": [{"skill": "name", "confidence": <0-1>}],
  "missing_skills": [{"skill": "name", "priority": "high|medium|low", "learning_time": "X weeks"}],
  "recommendations": ["actionable advice 1", "actionable advice 2", "actionable advice 3"]
}

Be realistic about match_score (0-100). Identify 3-8 missing skills max. Provide 3-5 specific recommendations.
{json_only}"#;
