use serde::Deserialize;
use utoipa::IntoParams;

use crate::utils::range::ListRange;

/// Inclusive index window over a follow list; negative values count from the end.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    #[serde(default)]
    pub start: i64,
    #[serde(default = "default_stop")]
    pub stop: i64,
}

impl Default for RangeQuery {
    fn default() -> Self {
        Self {
            start: 0,
            stop: default_stop(),
        }
    }
}

impl From<RangeQuery> for ListRange {
    fn from(query: RangeQuery) -> Self {
        ListRange::new(query.start, query.stop)
    }
}

fn default_stop() -> i64 {
    -1
}
