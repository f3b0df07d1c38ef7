//! Form state: the five editable fields and their normalization into an
//! `EvaluationRequest`.

use serde::{Deserialize, Serialize};

use crate::domain::EvaluationRequest;
use crate::error::FormError;

pub const DEFAULT_TOTAL_MARKS: f64 = 10.0;

/// Raw form contents. `rubrics` is the comma-separated text as typed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub rubrics: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub student_answer: String,
    #[serde(default = "default_total_marks")]
    pub total_marks: f64,
}

fn default_total_marks() -> f64 {
    DEFAULT_TOTAL_MARKS
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            question: String::new(),
            rubrics: String::new(),
            correct_answer: String::new(),
            student_answer: String::new(),
            total_marks: DEFAULT_TOTAL_MARKS,
        }
    }
}

/// Field names as they appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Question,
    Rubrics,
    CorrectAnswer,
    StudentAnswer,
    TotalMarks,
}

impl FormState {
    /// Set one field from its raw text. Only `total_marks` is interpreted.
    pub fn update_field(&mut self, field: FormField, raw: &str) {
        match field {
            FormField::Question => self.question = raw.to_string(),
            FormField::Rubrics => self.rubrics = raw.to_string(),
            FormField::CorrectAnswer => self.correct_answer = raw.to_string(),
            FormField::StudentAnswer => self.student_answer = raw.to_string(),
            FormField::TotalMarks => self.total_marks = parse_total_marks(raw),
        }
    }

    /// Normalize into a request. Rejects forms whose rubric list ends up empty.
    pub fn build_request(&self) -> Result<EvaluationRequest, FormError> {
        let rubrics = split_rubrics(&self.rubrics);
        if rubrics.is_empty() {
            return Err(FormError::NoRubrics);
        }
        Ok(EvaluationRequest {
            question: self.question.clone(),
            rubrics,
            correct_answer: self.correct_answer.clone(),
            student_answer: self.student_answer.clone(),
            total_marks: self.total_marks,
        })
    }

    /// Overwrite every field with the demonstration record.
    pub fn load_sample(&mut self, sample: &FormState) {
        *self = sample.clone();
    }
}

/// Split on commas, trim, drop empty pieces. Order is kept.
pub fn split_rubrics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

/// Never yields a non-numeric or negative value. Reads the longest numeric
/// prefix after leading whitespace ("12abc" is 12); no prefix means 0.
pub fn parse_total_marks(raw: &str) -> f64 {
    let s = raw.trim_start();
    match s[..numeric_prefix_len(s)].parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Byte length of `[+-]digits[.digits][(e|E)[+-]digits]` at the start of `s`.
/// Zero when there is no digit in the mantissa.
fn numeric_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut seen_digit = int_end > i;
    i = int_end;
    if b.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        seen_digit |= frac_end > i + 1;
        i = frac_end;
    }
    if !seen_digit {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}
