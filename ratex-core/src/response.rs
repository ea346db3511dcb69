use serde::{Deserialize, Serialize};

/// Finalized output of one completed trial. Created exactly once at
/// submission, immutable thereafter, handed to the host and discarded.
/// `question_numbers` is 1-based and positionally aligned with
/// `response_values`, both in descriptor declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub elapsed_response_time: u64,
    pub question_numbers: Vec<usize>,
    pub response_values: Vec<i64>,
    pub stimulus_image: String,
    pub stimulus_word: String,
}

impl ResponseRecord {
    /// Alignment invariant shared by every construction path.
    pub fn is_aligned(&self) -> bool {
        self.question_numbers.len() == self.response_values.len()
            && self
                .question_numbers
                .iter()
                .enumerate()
                .all(|(i, &n)| n == i + 1)
    }
}
