pub mod example;

pub use example::{DESTINATION_NAME, EnrichedRecord, LoadTarget, MetricRecord, extract, transform};
