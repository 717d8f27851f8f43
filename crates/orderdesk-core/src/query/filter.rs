//! Filter set compilation: the pushed-down `WHERE` clause.

use orderdesk_proto::FilterModel;
use tracing::debug;

use super::columns::ColumnRegistry;
use super::predicate::{Fragment, PredicateCompiler};
use crate::store::Dialect;

/// Compiles a whole filter model into one `WHERE` clause.
#[derive(Debug, Clone, Copy)]
pub struct FilterSetCompiler {
    predicates: PredicateCompiler,
}

impl FilterSetCompiler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            predicates: PredicateCompiler::new(dialect),
        }
    }

    /// Compile every filtered column and conjoin the predicates.
    ///
    /// Columns are visited in sorted order. Descriptors that do not compile
    /// are skipped silently; an empty model gives an empty clause.
    pub fn compile(&self, model: &FilterModel) -> Fragment {
        let mut fragments = Vec::with_capacity(model.len());
        for (name, descriptor) in model.iter() {
            let column = ColumnRegistry::resolve(name);
            match self.predicates.compile_descriptor(&column.sql(), descriptor) {
                Some(fragment) => fragments.push(fragment),
                None => debug!(
                    column = name,
                    filter_type = ?descriptor.filter_type,
                    operator = ?descriptor.operator,
                    "filter not pushed down"
                ),
            }
        }
        Fragment::conjunction(fragments).prefixed("WHERE")
    }
}
