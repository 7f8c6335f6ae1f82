//! Classification of typed responses against their ground truth.

use lingularity_types::ResponseEvaluation;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::articles::article_stripped_noun;
use crate::deviation::char_deviation_count;

/// Shortest ground-truth token that may still deviate by one character.
const MIN_TOLERANT_TOKEN_LEN: usize = 4;

/// Classify `response` against `ground_truth`.
///
/// `identification_aid` is a hint the learner was shown (for example `"to "`
/// before English verbs). It is prepended to the trimmed response, except
/// when the response already starts with it, so `"to eat"` with aid `"to "`
/// stays `"to eat"` rather than becoming `"to to eat"`. Returns the adjusted
/// response with its outcome. Never fails.
pub fn evaluate(
    response: &str,
    ground_truth: &str,
    identification_aid: &str,
) -> (String, ResponseEvaluation) {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return (String::new(), ResponseEvaluation::NoResponse);
    }

    let adjusted = if identification_aid.is_empty() || trimmed.starts_with(identification_aid) {
        trimmed.to_string()
    } else {
        format!("{identification_aid}{trimmed}")
    };

    let outcome = classify(&adjusted, ground_truth);
    (adjusted, outcome)
}

fn classify(response: &str, ground_truth: &str) -> ResponseEvaluation {
    if response == ground_truth {
        return ResponseEvaluation::Correct;
    }

    if strip_accents(response) == strip_accents(ground_truth) {
        return ResponseEvaluation::AccentError;
    }

    if let Some(truth_noun) = article_stripped_noun(ground_truth) {
        if response == truth_noun {
            return ResponseEvaluation::MissingArticle;
        }
        if article_stripped_noun(response) == Some(truth_noun) {
            return ResponseEvaluation::WrongArticle;
        }
    }

    if is_almost_correct(response, ground_truth) {
        return ResponseEvaluation::AlmostCorrect;
    }

    ResponseEvaluation::Wrong
}

/// Remove diacritics via NFKD decomposition.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Token-wise comparison allowing one deviating character per sufficiently long token.
pub fn is_almost_correct(response: &str, ground_truth: &str) -> bool {
    let response_tokens: Vec<&str> = response.split_whitespace().collect();
    let truth_tokens: Vec<&str> = ground_truth.split_whitespace().collect();
    if response_tokens.len() != truth_tokens.len() {
        return false;
    }

    response_tokens
        .iter()
        .zip(&truth_tokens)
        .all(|(response_token, truth_token)| {
            match char_deviation_count(response_token, truth_token) {
                0 => true,
                1 => truth_token.chars().count() >= MIN_TOLERANT_TOKEN_LEN,
                _ => false,
            }
        })
}
