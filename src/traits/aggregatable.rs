/// The projection of an entity the aggregator folds.
///
/// `category` keys the running sum/count and the secondary list;
/// `subcategory` keys a second sum/count table; `bucket_measure` picks the
/// distribution bucket.
pub trait Aggregatable: Send + Sync {
    fn category(&self) -> &str;

    fn subcategory(&self) -> Option<&str> {
        None
    }

    fn primary_measure(&self) -> f64;

    fn secondary_measure(&self) -> Option<i64> {
        None
    }

    fn bucket_measure(&self) -> f64;
}
