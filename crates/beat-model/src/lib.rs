// Chart data model: columns, notes, timeline, validated note chart

mod chart;
mod column;
mod error;
mod note;
mod timeline;

pub use chart::NoteChart;
pub use column::Column;
pub use error::ChartError;
pub use note::{KeysoundId, Note, NoteId};
pub use timeline::{BpmChange, Timeline};
