use serde::{Serialize, Deserialize};

/// One sampled point of the training curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossRecord {
    /// 0-based epoch number, counted across every `fit` call on the classifier.
    pub epoch: usize,
    /// Mean binary cross-entropy measured before that epoch's update.
    pub loss: f64,
}

/// Append-only sequence of sampled losses.
///
/// Only the training loop appends; everything else sees it through `&`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    records: Vec<LossRecord>,
}

impl LossHistory {
    pub fn new() -> Self {
        LossHistory::default()
    }

    pub(crate) fn push(&mut self, epoch: usize, loss: f64) {
        self.records.push(LossRecord { epoch, loss });
    }

    pub fn records(&self) -> &[LossRecord] {
        &self.records
    }

    /// Loss values only, in sampling order (what a plot would use).
    pub fn losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.loss).collect()
    }

    pub fn last(&self) -> Option<&LossRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the records as a pretty-printed JSON array.
    pub fn save_json(&self, path: &str) -> crate::error::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }
}
