//! ATS scoring: a pluggable strategy computed once at intake and stored with
//! the submission.
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`; the backend is picked at startup
//! from `ATS_SCORER`.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

pub const MAX_SCORE: i32 = 100;

/// What a scorer sees about one application.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Skills the applicant declared in `form_data`.
    pub candidate_skills: &'a [String],
    /// Skills the job asks for.
    pub required_skills: &'a [String],
}

/// Implement this to swap scoring without touching the intake workflow.
pub trait AtsScorer: Send + Sync {
    /// Returns a score in `0..=100`.
    fn score(&self, input: &ScoringInput<'_>) -> i32;

    /// Short backend name, logged at startup.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// SkillCountScorer
// ────────────────────────────────────────────────────────────────────────────

/// Flat heuristic: 70 plus 5 per declared skill, capped at 100.
/// Ignores the job entirely.
pub struct SkillCountScorer;

const SKILL_COUNT_BASE: i32 = 70;
const SKILL_COUNT_STEP: i32 = 5;

impl AtsScorer for SkillCountScorer {
    fn score(&self, input: &ScoringInput<'_>) -> i32 {
        let count = i32::try_from(input.candidate_skills.len()).unwrap_or(i32::MAX);
        count
            .saturating_mul(SKILL_COUNT_STEP)
            .saturating_add(SKILL_COUNT_BASE)
            .min(MAX_SCORE)
    }

    fn name(&self) -> &'static str {
        "skill_count"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SkillOverlapScorer
// ────────────────────────────────────────────────────────────────────────────

/// Share of the job's required skills the applicant covers, mapped onto
/// `[50, 100]`. Matching is case-insensitive on trimmed names.
///
/// Both lists are deduplicated after normalizing, so a repeated required
/// skill counts once. A job with no required skills scores every applicant 50.
pub struct SkillOverlapScorer;

const OVERLAP_FLOOR: f64 = 50.0;

fn normalized(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AtsScorer for SkillOverlapScorer {
    fn score(&self, input: &ScoringInput<'_>) -> i32 {
        let required = normalized(input.required_skills);
        if required.is_empty() {
            return OVERLAP_FLOOR as i32;
        }
        let candidate = normalized(input.candidate_skills);
        let matched = required.intersection(&candidate).count();

        let pct = matched as f64 / required.len() as f64 * 100.0;
        ((OVERLAP_FLOOR + pct / 2.0).round() as i32).min(MAX_SCORE)
    }

    fn name(&self) -> &'static str {
        "skill_overlap"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    SkillCount,
    SkillOverlap,
}

impl ScorerKind {
    pub fn build(self) -> Arc<dyn AtsScorer> {
        match self {
            ScorerKind::SkillCount => Arc::new(SkillCountScorer),
            ScorerKind::SkillOverlap => Arc::new(SkillOverlapScorer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scorer '{0}', expected 'skill_count' or 'skill_overlap'")]
pub struct UnknownScorer(String);

impl FromStr for ScorerKind {
    type Err = UnknownScorer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skill_count" => Ok(ScorerKind::SkillCount),
            "skill_overlap" => Ok(ScorerKind::SkillOverlap),
            other => Err(UnknownScorer(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn score(scorer: &dyn AtsScorer, candidate: &[&str], required: &[&str]) -> i32 {
        let candidate = skills(candidate);
        let required = skills(required);
        scorer.score(&ScoringInput {
            candidate_skills: &candidate,
            required_skills: &required,
        })
    }

    #[test]
    fn test_skill_count_base_and_step() {
        assert_eq!(score(&SkillCountScorer, &[], &[]), 70);
        assert_eq!(score(&SkillCountScorer, &["Go", "AWS"], &[]), 80);
    }

    #[test]
    fn test_skill_count_caps_at_100() {
        let many: Vec<&str> = vec!["x"; 7];
        assert_eq!(score(&SkillCountScorer, &many, &[]), 100);
        let lots: Vec<&str> = vec!["x"; 50];
        assert_eq!(score(&SkillCountScorer, &lots, &[]), 100);
    }

    #[test]
    fn test_skill_count_ignores_job_requirements() {
        assert_eq!(
            score(&SkillCountScorer, &["Go"], &["Rust", "Postgres"]),
            75
        );
    }

    #[test]
    fn test_overlap_scales_into_50_100() {
        let required = ["Rust", "Postgres", "AWS", "Docker"];
        assert_eq!(score(&SkillOverlapScorer, &[], &required), 50);
        assert_eq!(score(&SkillOverlapScorer, &["rust", "aws"], &required), 75);
        assert_eq!(
            score(
                &SkillOverlapScorer,
                &["RUST", "postgres", "aws", "docker", "go"],
                &required
            ),
            100
        );
    }

    #[test]
    fn test_overlap_rounds_and_dedups() {
        // 1 of 3 = 33.3% -> 50 + 16.67 -> 67
        assert_eq!(
            score(&SkillOverlapScorer, &["Go", "go", " GO "], &["Go", "Rust", "AWS"]),
            67
        );
    }

    #[test]
    fn test_repeated_required_skill_counts_once() {
        // {go, rust}: 2 of 2 covered
        assert_eq!(
            score(&SkillOverlapScorer, &["Go", "Rust"], &["Go", "go", "Rust"]),
            100
        );
    }

    #[test]
    fn test_overlap_without_requirements_is_floor() {
        assert_eq!(score(&SkillOverlapScorer, &["Go", "AWS"], &[]), 50);
    }

    #[test]
    fn test_scorer_kind_parsing() {
        assert_eq!("skill_count".parse::<ScorerKind>().unwrap(), ScorerKind::SkillCount);
        assert_eq!(
            " Skill_Overlap ".parse::<ScorerKind>().unwrap(),
            ScorerKind::SkillOverlap
        );
        let err = "llm".parse::<ScorerKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown scorer 'llm', expected 'skill_count' or 'skill_overlap'"
        );
    }

    #[test]
    fn test_build_returns_matching_backend() {
        assert_eq!(ScorerKind::SkillCount.build().name(), "skill_count");
        assert_eq!(ScorerKind::SkillOverlap.build().name(), "skill_overlap");
    }
}
