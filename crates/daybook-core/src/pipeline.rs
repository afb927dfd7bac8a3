//! Left-to-right stage composition.
//!
//! Each provider wires the same shape of sequence: fetch raw text, parse it,
//! normalize the results. [`Pipeline`] expresses that wiring as an ordered
//! chain of single-argument stages, each consuming the previous stage's
//! output. Stage boundaries are typed, so the compiler checks that adjacent
//! stages agree on the element flowing between them.
//!
//! Stages may produce lazy iterators; the pipeline never forces a stage's
//! output, so a downstream stage can consume its input incrementally.

/// A value being threaded through an ordered chain of transform stages.
#[derive(Debug)]
pub struct Pipeline<T> {
    value: T,
}

impl<T> Pipeline<T> {
    /// Starts a pipeline with an initial value.
    pub fn start(value: T) -> Self {
        Self { value }
    }

    /// Applies the next stage to the current value.
    pub fn then<U, F>(self, stage: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> U,
    {
        Pipeline {
            value: stage(self.value),
        }
    }

    /// Returns the final stage's result.
    pub fn finish(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn stages_apply_in_order() {
        let result = Pipeline::start(2)
            .then(|n| n + 3)
            .then(|n| n * 10)
            .then(|n| format!("{n}"))
            .finish();

        assert_eq!(result, "50");
    }

    #[test]
    fn single_value_passthrough() {
        assert_eq!(Pipeline::start("unchanged").finish(), "unchanged");
    }

    #[test]
    fn iterator_stages_stay_lazy() {
        let pulls = Cell::new(0usize);

        let iter = Pipeline::start(0..100)
            .then(|nums| {
                nums.map(|n| {
                    pulls.set(pulls.get() + 1);
                    n * 2
                })
            })
            .then(|doubled| doubled.filter(|n| n % 3 == 0))
            .finish();

        // Nothing has been evaluated yet.
        assert_eq!(pulls.get(), 0);

        let first: Vec<_> = iter.take(2).collect();
        assert_eq!(first, vec![0, 6]);
        // Only enough of the source was pulled to produce two outputs.
        assert_eq!(pulls.get(), 4);
    }
}
