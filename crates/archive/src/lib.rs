#![warn(missing_docs)]
//! Counted-aggregate item archive.
//!
//! An [`Archive`] stores any number of item types as one counted entry per
//! type instead of one stack per slot. The same contents are exposed through
//! two transfer contracts: [`SlotView`] for slot-scanning movers and
//! [`BulkView`] for predicate-filtered bulk movers. Contents persist by stable
//! name through [`PersistenceCodec`], so a save survives runs in which the
//! numeric item ids were assigned differently.
//!
//! Nothing in this crate is synchronised. Every call, including the ones that
//! originate from network handlers, must be scheduled onto the thread that
//! owns the archive.

mod archive;
mod bulk;
mod codec;
mod error;
mod file;
mod key;
mod names;
mod notify;
mod slots;
mod store;

pub use archive::Archive;
pub use bulk::BulkView;
pub use codec::{ArchiveRecord, LoadReport, LostGroup, PersistenceCodec, StoredEntry};
pub use error::ArchiveError;
pub use file::{ArchiveDocument, ArchiveFile, ARCHIVE_FORMAT_VERSION};
pub use key::{CompositeKey, KeyCodec};
pub use names::StableNameMapper;
pub use notify::{ChangeNotifier, Revision};
pub use slots::SlotView;
pub use store::{AggregateStore, StoreSnapshot, DEFAULT_TYPE_CAPACITY, MAX_TYPE_CAPACITY};
