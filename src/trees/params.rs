use crate::error::TreeError;
use crate::trees::criterion::Criterion;

/// Stopping rules shared by every tree builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    pub min_samples_split: u16,
    pub max_depth: Option<u16>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            min_samples_split: 2,
            max_depth: None,
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        if min_samples_split < 2 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples to split must be greater than 1.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidParameter(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    /// Whether a node at `depth` holding `num_samples` rows may still be split.
    pub fn allows_split(&self, num_samples: usize, depth: u16) -> bool {
        num_samples >= usize::from(self.min_samples_split)
            && self.max_depth.map_or(true, |max_depth| depth < max_depth)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeClassifierParams {
    pub base_params: TreeParams,
    pub criterion: Criterion,
}

impl TreeClassifierParams {
    pub fn new() -> Self {
        Self {
            base_params: TreeParams::new(),
            criterion: Criterion::Gini,
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.base_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.base_params.set_max_depth(max_depth)
    }

    pub fn set_criterion(&mut self, criterion: Criterion) {
        self.criterion = criterion;
    }

    pub fn min_samples_split(&self) -> u16 {
        self.base_params.min_samples_split
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.base_params.max_depth
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }
}
