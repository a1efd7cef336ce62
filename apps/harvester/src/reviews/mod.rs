// Employer reviews: per-review normalization and the paginated aggregator.

pub mod normalizer;
pub mod pagination;
