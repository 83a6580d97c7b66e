//! Measure rules tallying structural metrics.

mod definition_counts;
mod statement_counts;

pub use definition_counts::DefinitionCounts;
pub use statement_counts::StatementCounts;

use crate::rules::Rule;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(StatementCounts::new()),
        Box::new(DefinitionCounts::new()),
    ]
}
