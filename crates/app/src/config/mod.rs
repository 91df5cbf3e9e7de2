use serde::{Deserialize, Serialize};

/// Optional reporting window. All fields empty means the whole ledger.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RangeParams {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeParams {
    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.start.is_none() && self.end.is_none()
    }
}
