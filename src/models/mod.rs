pub mod case;
pub mod entries;
pub mod intraop_record;
pub mod patch;
pub mod phase;

pub use case::*;
pub use entries::*;
pub use intraop_record::*;
pub use patch::*;
pub use phase::*;
