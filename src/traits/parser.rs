use async_trait::async_trait;

use crate::errors::RecordError;
use crate::model::RawRecord;

/// Converts a width-validated [`RawRecord`] into a typed entity.
///
/// Implementations are shared by every worker in the pool, so they must not
/// rely on mutable state. A returned error drops only the record in hand.
#[async_trait]
pub trait RecordParser: Send + Sync + 'static {
    type Entity: Send + 'static;

    async fn parse(&self, record: &RawRecord) -> Result<Self::Entity, RecordError>;

    /// Number of columns a record must have to reach `parse`
    fn schema_width(&self) -> usize;

    fn name(&self) -> &'static str;
}
