use thiserror::Error;
use tomevault_core::ItemTypeDescriptor;

/// Errors surfaced by archive operations.
///
/// Transfer rejections and capacity limits are not errors; they come back as
/// remainders. Load-time losses are collected in a `LoadReport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// The item family is not registered in this run.
    #[error("item {0} is not registered")]
    UnknownItem(ItemTypeDescriptor),
}
