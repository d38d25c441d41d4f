//! Intermediate supervision over the stage heatmaps.

use crate::{common::*, model::HourglassOutput};
use tch_modules::L2Loss;

/// Sums the squared heatmap error of every stage, normalized by the batch size.
#[derive(Debug)]
pub struct MultiStageLoss {
    l2: L2Loss,
}

#[derive(Debug)]
pub struct MultiStageLossOutput {
    pub total: Tensor,
    /// Loss of each stage, innermost stage first.
    pub stages: Vec<Tensor>,
}

impl MultiStageLoss {
    pub fn new() -> Self {
        Self {
            l2: L2Loss::new(Reduction::Sum),
        }
    }

    pub fn forward(
        &self,
        output: &HourglassOutput,
        target: &Tensor,
    ) -> Result<MultiStageLossOutput> {
        let HourglassOutput { auxiliary, .. } = output;
        ensure!(!auxiliary.is_empty(), "the model has no auxiliary outputs");

        let (batch_size, _c, _h, _w) = target.size4()?;
        ensure!(batch_size > 0, "the batch is empty");

        let stages: Vec<_> = auxiliary
            .iter()
            .enumerate()
            .map(|(index, heatmap)| -> Result<_> {
                let loss = self
                    .l2
                    .forward(heatmap, target)
                    .with_context(|| format!("invalid heatmap at stage {}", index))?;
                Ok(loss / batch_size as f64)
            })
            .try_collect()?;

        let total = stages
            .iter()
            .skip(1)
            .fold(stages[0].shallow_clone(), |acc, loss| acc + loss);

        Ok(MultiStageLossOutput { total, stages })
    }
}

impl Default for MultiStageLoss {
    fn default() -> Self {
        Self::new()
    }
}
