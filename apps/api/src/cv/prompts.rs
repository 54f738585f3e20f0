// CV skill extraction prompt templates.

pub const CV_EXTRACTION_SYSTEM: &str =
    "You are a skill extraction expert. Always return valid JSON arrays only.";

pub const CV_EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert skill extraction system. Analyze the following CV/resume text and extract ALL relevant professional skills.

Extract both:
1. EXPLICIT SKILLS: Technical skills, tools, frameworks, programming languages directly mentioned
2. IMPLICIT SKILLS: Soft skills and competencies inferred from experience descriptions (leadership, communication, problem-solving, etc.)

For each skill provide:
- name: The skill name (normalize to standard terms)
- confidence: Float 0-1 (how confident you are this is a real skill)
- category: One of: "technical", "soft_skill", "domain_knowledge", "tool", "language"
- evidence: Brief quote from CV showing this skill (max 100 chars)

CV Text:
{cv_text}

CRITICAL: Return ONLY a valid JSON array. No markdown, no explanation, just the array:
[{"name":"Python","confidence":0.95,"category":"language","evidence":"5 years Python development"},{"name":"Leadership","confidence":0.85,"category":"soft_skill","evidence":"Managed team of 5 developers"}]"#;
