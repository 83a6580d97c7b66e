//! Scan rules reporting code quality issues.

mod duplicate_import;
mod max_parameters;
mod no_debugger;
mod no_print;
mod no_unwrap;
mod singleton_comparison;
mod todo_comment;

pub use duplicate_import::DuplicateImport;
pub use max_parameters::MaxParameters;
pub use no_debugger::NoDebugger;
pub use no_print::NoPrint;
pub use no_unwrap::NoUnwrap;
pub use singleton_comparison::SingletonComparison;
pub use todo_comment::TodoComment;

use crate::rules::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoPrint::new()),
        Box::new(MaxParameters::new()),
        Box::new(SingletonComparison::new()),
        Box::new(TodoComment::new()),
        Box::new(DuplicateImport::new()),
        Box::new(NoUnwrap::new()),
        Box::new(NoDebugger::new()),
    ]
}
