pub mod attr;
pub mod cv;
pub mod file;
pub mod report;

pub use attr::AttrValue;
pub use cv::{CvSource, CvTerm, MemoryCv, TermKind};
pub use file::{DataFile, MemoryDataFile};
pub use report::{CheckLevel, CheckMessage, CheckResult, MessageKind};
