use serde::Deserialize;
use std::fmt;

/// One stage of the batch pipeline. Stages always run in declaration order.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    #[serde(rename(deserialize = "extract"))]
    Extract,
    #[serde(rename(deserialize = "clip"))]
    Clip,
    #[serde(rename(deserialize = "aggregate"))]
    Aggregate,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Extract, Step::Clip, Step::Aggregate];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::Extract => write!(f, "extract"),
            Step::Clip => write!(f, "clip"),
            Step::Aggregate => write!(f, "aggregate"),
        }
    }
}
