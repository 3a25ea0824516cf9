//! Step definitions and the validated, immutable step registry.
//!
//! The registry is process-wide static configuration: built once at startup,
//! validated fail-fast against the reference text, never mutated afterwards.

use serde::Serialize;

use crate::error::{Result, WalkthroughError};

/// Inclusive, 1-indexed line interval of the reference text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl HighlightRange {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self { start_line, end_line }
    }

    pub fn contains(&self, line_number: usize) -> bool {
        line_number >= self.start_line && line_number <= self.end_line
    }
}

/// Which animated simulation a step binds to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationKind {
    None,
    SlidingWindow,
    DataCleaning,
    ArchitectureHighlight,
    TrainingCurve,
}

/// One unit of the linear narrative.
#[derive(Debug, Clone, Serialize)]
pub struct StepDefinition {
    pub id: usize,
    pub title: String,
    pub range: HighlightRange,
    pub kind: SimulationKind,
}

impl StepDefinition {
    fn new(id: usize, title: &str, range: (usize, usize), kind: SimulationKind) -> Self {
        Self {
            id,
            title: title.to_string(),
            range: HighlightRange::new(range.0, range.1),
            kind,
        }
    }
}

/// Ordered, validated sequence of steps.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Validates every step against `line_count` lines of reference text.
    /// All configuration errors surface here, never at render time.
    pub fn new(steps: Vec<StepDefinition>, line_count: usize) -> Result<Self> {
        if steps.is_empty() {
            return Err(WalkthroughError::EmptyRegistry);
        }
        for (index, step) in steps.iter().enumerate() {
            if step.id != index {
                return Err(WalkthroughError::MisnumberedStep { index, id: step.id });
            }
            let r = step.range;
            if r.start_line == 0 || r.start_line > r.end_line || r.end_line > line_count {
                return Err(WalkthroughError::InvalidRange {
                    step: step.id,
                    start: r.start_line,
                    end: r.end_line,
                    line_count,
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }
}

/// The builtin narrative over the traffic-prediction training script.
pub fn builtin_steps() -> Vec<StepDefinition> {
    use SimulationKind::*;
    vec![
        StepDefinition::new(0, "Predicting the Future of Traffic", (1, 28), None),
        StepDefinition::new(1, "1. Libraries & Setup", (1, 12), None),
        StepDefinition::new(2, "2. Setting the Rules (Config)", (14, 28), None),
        StepDefinition::new(3, "3. Data Prep & Time Travel", (30, 57), DataCleaning),
        StepDefinition::new(4, "4. Sliding Window Concept", (59, 73), SlidingWindow),
        StepDefinition::new(5, "5. The Brain (CNN + GRU)", (75, 117), ArchitectureHighlight),
        StepDefinition::new(6, "6. The Training Loop", (121, 159), TrainingCurve),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ReferenceText;

    #[test]
    fn builtin_steps_validate_against_embedded_script() {
        let script = ReferenceText::embedded();
        let registry = StepRegistry::new(builtin_steps(), script.line_count()).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.get(3).unwrap().range, HighlightRange::new(30, 57));
    }

    #[test]
    fn inverted_range_fails_fast() {
        let steps = vec![StepDefinition::new(0, "bad", (12, 3), SimulationKind::None)];
        let err = StepRegistry::new(steps, 100).unwrap_err();
        assert_eq!(
            err,
            WalkthroughError::InvalidRange {
                step: 0,
                start: 12,
                end: 3,
                line_count: 100
            }
        );
    }

    #[test]
    fn out_of_bounds_range_fails_fast() {
        let steps = vec![StepDefinition::new(0, "bad", (1, 101), SimulationKind::None)];
        assert!(matches!(
            StepRegistry::new(steps, 100),
            Err(WalkthroughError::InvalidRange { .. })
        ));
    }

    #[test]
    fn zero_start_line_is_rejected() {
        let steps = vec![StepDefinition::new(0, "bad", (0, 5), SimulationKind::None)];
        assert!(matches!(
            StepRegistry::new(steps, 100),
            Err(WalkthroughError::InvalidRange { .. })
        ));
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert_eq!(
            StepRegistry::new(Vec::new(), 100).unwrap_err(),
            WalkthroughError::EmptyRegistry
        );
    }

    #[test]
    fn non_dense_ids_are_rejected() {
        let steps = vec![
            StepDefinition::new(0, "a", (1, 2), SimulationKind::None),
            StepDefinition::new(2, "b", (3, 4), SimulationKind::None),
        ];
        assert_eq!(
            StepRegistry::new(steps, 100).unwrap_err(),
            WalkthroughError::MisnumberedStep { index: 1, id: 2 }
        );
    }
}
