use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::skill::{SkillRow, SkillSource, DEFAULT_CATEGORY};

const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillStats {
    pub total_skills: usize,
    pub cv_skills: usize,
    pub github_skills: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub skills: Vec<SkillRow>,
    pub skills_by_source: BTreeMap<String, Vec<SkillRow>>,
    pub skills_by_category: BTreeMap<String, Vec<SkillRow>>,
    pub stats: SkillStats,
}

fn group_by<F>(skills: &[SkillRow], key: F) -> BTreeMap<String, Vec<SkillRow>>
where
    F: Fn(&SkillRow) -> &str,
{
    let mut groups: BTreeMap<String, Vec<SkillRow>> = BTreeMap::new();
    for skill in skills {
        groups
            .entry(key(skill).to_string())
            .or_default()
            .push(skill.clone());
    }
    groups
}

/// Sorts by numeric confidence (highest first) and groups by source and category.
pub fn summarize(mut skills: Vec<SkillRow>) -> SkillSummary {
    skills.sort_by(|a, b| b.confidence_value().total_cmp(&a.confidence_value()));

    let skills_by_source = group_by(&skills, |s| {
        s.source
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
    });
    let skills_by_category = group_by(&skills, |s| {
        s.category
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    });

    let count = |source: SkillSource| skills_by_source.get(source.as_str()).map_or(0, Vec::len);
    let stats = SkillStats {
        total_skills: skills.len(),
        cv_skills: count(SkillSource::Cv),
        github_skills: count(SkillSource::Github),
    };

    SkillSummary {
        skills,
        skills_by_source,
        skills_by_category,
        stats,
    }
}
