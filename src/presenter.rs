//! Result presentation: pure derivations from an `EvaluationResponse` to the
//! labels, colors and groups the page shows.
//!
//! Grade tiers and score labels come from ordered `(threshold, value)` tables.
//! Lower bounds are inclusive and the first match wins, so every value (NaN
//! included) lands in exactly one bucket.

use serde::Serialize;

use crate::domain::{EvaluationResponse, RubricAnalysis};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTier {
  Tier1,
  Tier2,
  Tier3,
  Tier4,
  Tier5,
}

impl GradeTier {
  pub fn color(self) -> &'static str {
    match self {
      GradeTier::Tier1 => "#4ade80",
      GradeTier::Tier2 => "#60a5fa",
      GradeTier::Tier3 => "#fbbf24",
      GradeTier::Tier4 => "#fb923c",
      GradeTier::Tier5 => "#f87171",
    }
  }
}

/// Percentage (0-100) thresholds, highest first.
const GRADE_TIERS: &[(f64, GradeTier)] = &[
  (85.0, GradeTier::Tier1),
  (70.0, GradeTier::Tier2),
  (55.0, GradeTier::Tier3),
  (40.0, GradeTier::Tier4),
];

/// Score (0-1) thresholds, highest first.
const SCORE_LABELS: &[(f64, &str)] = &[
  (0.85, "Excellent"),
  (0.70, "Good"),
  (0.55, "Satisfactory"),
  (0.40, "Fair"),
];

fn first_match<T: Copy>(table: &[(f64, T)], fallback: T, value: f64) -> T {
  table
    .iter()
    .find(|(threshold, _)| value >= *threshold)
    .map(|(_, v)| *v)
    .unwrap_or(fallback)
}

pub fn grade_tier(percentage: f64) -> GradeTier {
  first_match(GRADE_TIERS, GradeTier::Tier5, percentage)
}

pub fn grade_color(percentage: f64) -> &'static str {
  grade_tier(percentage).color()
}

pub fn score_label(score: f64) -> &'static str {
  first_match(SCORE_LABELS, "Needs Improvement", score)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
  Covered,
  Partial,
  Missing,
}

impl ConceptKind {
  pub fn heading(self) -> &'static str {
    match self {
      ConceptKind::Covered => "Covered Concepts",
      ConceptKind::Partial => "Partially Covered",
      ConceptKind::Missing => "Missing Concepts",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConceptGroup {
  pub kind: ConceptKind,
  pub heading: &'static str,
  pub count: usize,
  pub concepts: Vec<String>,
}

/// Covered, partial, missing, in that order. Empty groups are omitted; an
/// absent partial list is omitted the same way.
pub fn group_concepts(analysis: &RubricAnalysis) -> Vec<ConceptGroup> {
  let lists = [
    (ConceptKind::Covered, Some(&analysis.covered_concepts)),
    (ConceptKind::Partial, analysis.partial_concepts.as_ref()),
    (ConceptKind::Missing, Some(&analysis.missing_concepts)),
  ];
  lists
    .into_iter()
    .filter_map(|(kind, list)| {
      let list = list.filter(|l| !l.is_empty())?;
      Some(ConceptGroup { kind, heading: kind.heading(), count: list.len(), concepts: list.clone() })
    })
    .collect()
}

/// Fixed-point text with `digits` decimals. Exact ties round away from zero,
/// so 87.25 shows as "87.3" where `{:.1}` alone would give "87.2".
pub fn to_fixed(x: f64, digits: usize) -> String {
  if !x.is_finite() {
    return format!("{x:.digits$}");
  }
  let abs = x.abs();
  // Any double with a 5 in this position terminates well within these digits.
  let exact = format!("{:.*}", digits + 96, abs);
  let frac = exact.split_once('.').map(|(_, f)| f).unwrap_or("");
  let tie = frac.as_bytes().get(digits) == Some(&b'5') && frac.bytes().skip(digits + 1).all(|b| b == b'0');
  let abs = if tie { f64::from_bits(abs.to_bits() + 1) } else { abs };
  let body = format!("{abs:.digits$}");
  if x < 0.0 { format!("-{body}") } else { body }
}

/// One paragraph per line. Blank lines are kept as empty paragraphs.
pub fn render_feedback(feedback: &str) -> impl Iterator<Item = &str> + '_ {
  feedback.split('\n')
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRow {
  pub name: &'static str,
  pub value_text: String,
  /// Progress-bar width in percent, clamped to [0, 100].
  pub bar_width: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<&'static str>,
}

fn score_row(name: &'static str, score: f64, labelled: bool) -> ScoreRow {
  let pct = score * 100.0;
  ScoreRow {
    name,
    value_text: format!("{}%", to_fixed(pct, 1)),
    bar_width: if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) },
    label: labelled.then(|| score_label(score)),
  }
}

/// Everything the results section shows, already formatted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultView {
  pub grade_text: String,
  pub percentage_text: String,
  pub tier: GradeTier,
  pub color: &'static str,
  pub scores: Vec<ScoreRow>,
  pub concept_groups: Vec<ConceptGroup>,
  pub feedback: Vec<String>,
}

pub fn present(resp: &EvaluationResponse) -> ResultView {
  let tier = grade_tier(resp.percentage);
  let s = &resp.scores;
  ResultView {
    grade_text: format!("{} / {}", to_fixed(resp.suggested_grade, 2), resp.total_marks),
    percentage_text: format!("{}%", to_fixed(resp.percentage, 1)),
    tier,
    color: grade_color(resp.percentage),
    scores: vec![
      score_row("Rubric Coverage", s.rubric_score, true),
      score_row("Semantic Similarity", s.semantic_score, true),
      score_row("Consistency Check", s.nli_score, true),
      score_row("Final Score", s.final_score, false),
    ],
    concept_groups: group_concepts(&resp.rubric_analysis),
    feedback: render_feedback(&resp.feedback).map(String::from).collect(),
  }
}
