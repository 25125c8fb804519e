/// Default number of concurrent parser workers
pub const DEFAULT_WORKERS: usize = 3;
/// Default run deadline (5 seconds)
pub const DEFAULT_DEADLINE_MS: u64 = 5_000;
/// Default capacity of each inter-stage queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Default width of a distribution bucket, in measure units
pub const DEFAULT_BUCKET_WIDTH: u32 = 10;
/// Column count of the car sales schema
pub const REFERENCE_SCHEMA_WIDTH: usize = 15;
/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';
/// Literal field value meaning "missing"
pub const MISSING_SENTINEL: &str = ".";
