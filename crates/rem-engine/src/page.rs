use serde::{Deserialize, Serialize};

use rem_types::{Dataset, Entry};

pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_LIMIT: usize = 25;

/// Which slice of a dataset to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    pub fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    pub fn with_limit(self, limit: usize) -> Self {
        Self { limit, ..self }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of a dataset plus the request that produced it.
///
/// `total` is the length of the whole dataset, not of `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Entry>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

/// Slice `dataset` according to `request`. An offset past the end yields an
/// empty page.
pub fn paginate(dataset: &Dataset, request: PageRequest) -> Page {
    Page {
        data: dataset.slice(request.offset, request.limit).to_vec(),
        offset: request.offset,
        limit: request.limit,
        total: dataset.len(),
    }
}
