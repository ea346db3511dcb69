use ratex_core::{DefaultValuePolicy, LiveScaleState, ScaleDescriptor, TrialError};

/// Tracks the live value of every rendered scale and assembles the
/// positional response arrays at submission.
#[derive(Debug, Clone)]
pub struct ResponseCollector {
    live: Vec<LiveScaleState>,
}

impl ResponseCollector {
    pub fn new(descriptors: &[ScaleDescriptor], default_value: DefaultValuePolicy) -> Self {
        Self {
            live: descriptors
                .iter()
                .map(|d| LiveScaleState::initial(d, default_value))
                .collect(),
        }
    }

    /// Store a changed value verbatim. No clamping here; whatever the
    /// control let through is what gets recorded.
    pub fn value_changed(&mut self, index: usize, value: i64) -> Result<i64, TrialError> {
        let scale = self
            .live
            .get_mut(index)
            .ok_or(TrialError::NoSuchScale(index))?;
        scale.set(value);
        Ok(scale.value)
    }

    pub fn value(&self, index: usize) -> Option<i64> {
        self.live.get(index).map(|s| s.value)
    }

    pub fn live(&self) -> &[LiveScaleState] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Read every scale in descriptor order. Question numbers are 1-based;
    /// zero descriptors yield two empty vectors.
    pub fn assemble(&self) -> (Vec<usize>, Vec<i64>) {
        let question_numbers = (1..=self.live.len()).collect();
        let response_values = self.live.iter().map(|s| s.value).collect();
        (question_numbers, response_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratex_core::fixed_default;

    fn descriptors(n: usize) -> Vec<ScaleDescriptor> {
        (0..n)
            .map(|i| ScaleDescriptor {
                name: format!("q{}", i + 1),
                ..ScaleDescriptor::new("prompt", 0, 100)
            })
            .collect()
    }

    #[test]
    fn initial_values_come_from_the_policy() {
        let collector = ResponseCollector::new(&descriptors(3), fixed_default);
        assert_eq!(collector.value(0), Some(50));
        assert_eq!(collector.value(2), Some(50));
    }

    #[test]
    fn value_changed_mirrors_back_the_stored_value() {
        let mut collector = ResponseCollector::new(&descriptors(2), fixed_default);
        assert_eq!(collector.value_changed(1, 87), Ok(87));
        assert_eq!(collector.value(1), Some(87));
        // repeated changes keep mirroring
        assert_eq!(collector.value_changed(1, 3), Ok(3));
        assert_eq!(collector.value(1), Some(3));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut collector = ResponseCollector::new(&descriptors(1), fixed_default);
        assert_eq!(collector.value_changed(1, 0), Err(TrialError::NoSuchScale(1)));
    }

    #[test]
    fn assemble_preserves_descriptor_order() {
        let mut collector = ResponseCollector::new(&descriptors(3), fixed_default);
        collector.value_changed(0, 10).unwrap();
        collector.value_changed(2, 30).unwrap();
        let (numbers, values) = collector.assemble();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(values, vec![10, 50, 30]);
    }

    #[test]
    fn zero_descriptors_assemble_to_empty_arrays() {
        let collector = ResponseCollector::new(&[], fixed_default);
        let (numbers, values) = collector.assemble();
        assert!(numbers.is_empty());
        assert!(values.is_empty());
    }
}
