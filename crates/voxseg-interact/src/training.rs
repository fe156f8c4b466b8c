//! Training sample collections

/// Growable collection of training samples
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet<S> {
    samples: Vec<S>,
}

impl<S> Default for TrainingSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TrainingSet<S> {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn add(&mut self, sample: S) {
        self.samples.push(sample);
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.samples
    }
}

impl<S: Copy + Into<f64>> TrainingSet<S> {
    /// Mean and population standard deviation, `None` when empty
    pub fn mean_std(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;
        let mean = self.samples.iter().map(|&s| s.into()).sum::<f64>() / n;
        let var = self
            .samples
            .iter()
            .map(|&s| {
                let d = s.into() - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Some((mean, var.sqrt()))
    }
}

impl<S> Extend<S> for TrainingSet<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}

impl<'a, S> IntoIterator for &'a TrainingSet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
