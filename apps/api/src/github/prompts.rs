// GitHub skill extraction prompt templates.

pub const GITHUB_SKILLS_SYSTEM: &str = r#"You are a skills extraction expert. Analyze GitHub profile data and extract technical skills organized by category.
For each skill, assign:
- confidence (0-100): based on evidence from repos, languages, and activity
- trend (up/stable/down): estimate based on recent activity
- evidence: brief description of why this skill was identified

Return ONLY valid JSON in this exact format:
{
  "categories": [
    {
      "name": "Category Name",
      "icon": "icon-name",
      "skills": [
        {
          "name": "Skill Name",
          "confidence": 85,
          "trend": "up",
          "evidence": "Used in 5 repositories with 100+ commits"
        }
      ]
    }
  ]
}"#;

pub const GITHUB_SKILLS_PROMPT_TEMPLATE: &str = "\
Analyze this GitHub profile and extract skills:
{github_summary}";
