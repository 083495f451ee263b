//! Output stages: organizing rendered documents on disk, merging them,
//! and previewing the planned archive structure

pub mod merge;
pub mod organizer;
pub mod preview;

pub use merge::{ConcatComposer, DocumentComposer, MergeEngine};
pub use organizer::OutputOrganizer;
pub use preview::{ArchiveModelBuilder, PreviewNode};
