//! Positional character comparison between a response and its ground truth.
//!
//! Both strings are walked side by side. A mismatch normally consumes one
//! character of each; when the remaining ground truth is longer and the
//! response character reappears one position ahead in the ground truth, the
//! ground-truth character is taken as missing from the response. The mirror
//! case (a stray extra character in the response) is handled the same way.
//! Once either side runs out, the remainder of the other counts in full.

use bitvec::prelude::*;

pub type Mask = BitVec<usize, Lsb0>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    Match,
    Substitution,
    /// Ground-truth character absent from the response.
    Missing,
    /// Response character absent from the ground truth.
    Stray,
}

fn align(response: &[char], truth: &[char]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(response.len().max(truth.len()));
    let (mut r, mut t) = (0usize, 0usize);

    while r < response.len() && t < truth.len() {
        if response[r] == truth[t] {
            steps.push(Step::Match);
            r += 1;
            t += 1;
            continue;
        }

        let response_left = response.len() - r;
        let truth_left = truth.len() - t;
        if truth_left > response_left && truth.get(t + 1) == Some(&response[r]) {
            steps.push(Step::Missing);
            t += 1;
        } else if response_left > truth_left && response.get(r + 1) == Some(&truth[t]) {
            steps.push(Step::Stray);
            r += 1;
        } else {
            steps.push(Step::Substitution);
            r += 1;
            t += 1;
        }
    }

    steps.extend(std::iter::repeat_n(Step::Stray, response.len() - r));
    steps.extend(std::iter::repeat_n(Step::Missing, truth.len() - t));
    steps
}

/// Number of deviating characters between `response` and `ground_truth`.
pub fn char_deviation_count(response: &str, ground_truth: &str) -> usize {
    let response: Vec<char> = response.chars().collect();
    let truth: Vec<char> = ground_truth.chars().collect();
    align(&response, &truth)
        .into_iter()
        .filter(|step| *step != Step::Match)
        .count()
}

/// Per-character masks flagging deviating characters of each string.
///
/// Mask lengths equal the character counts of the respective inputs.
pub fn deviation_masks(response: &str, ground_truth: &str) -> (Mask, Mask) {
    let response: Vec<char> = response.chars().collect();
    let truth: Vec<char> = ground_truth.chars().collect();
    let mut response_mask = bitvec![usize, Lsb0; 0; response.len()];
    let mut truth_mask = bitvec![usize, Lsb0; 0; truth.len()];

    let (mut r, mut t) = (0usize, 0usize);
    for step in align(&response, &truth) {
        match step {
            Step::Match => {
                r += 1;
                t += 1;
            }
            Step::Substitution => {
                response_mask.set(r, true);
                truth_mask.set(t, true);
                r += 1;
                t += 1;
            }
            Step::Missing => {
                truth_mask.set(t, true);
                t += 1;
            }
            Step::Stray => {
                response_mask.set(r, true);
                r += 1;
            }
        }
    }

    (response_mask, truth_mask)
}

/// Render a mask as a caret line aligned under its string.
pub fn caret_line(mask: &Mask) -> String {
    mask.iter()
        .map(|bit| if *bit { '^' } else { ' ' })
        .collect::<String>()
        .trim_end()
        .to_string()
}
