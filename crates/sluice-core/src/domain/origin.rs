use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Event source of SNS notification records.
pub const SNS: &str = "aws:sns";

/// Event source of SQS message records.
pub const SQS: &str = "aws:sqs";

/// Discriminant selecting which extraction rules apply to a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginTag(String);

impl OriginTag {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OriginTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OriginTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OriginTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// HashMap<OriginTag, _> を &str で引けるようにする
impl Borrow<str> for OriginTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}
