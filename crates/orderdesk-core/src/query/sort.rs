//! Sort model compilation.

use orderdesk_proto::SortDescriptor;

use super::columns::ColumnRegistry;

/// Order applied when the grid sends no sort keys: most recently modified
/// orders first.
pub const DEFAULT_ORDER_BY: &str = "ORDER BY po.modified DESC, poi.name ASC";

/// Final key of every ordering. Order line names are unique, so
/// `LIMIT`/`OFFSET` pages never overlap.
const TIE_BREAKER: &str = "poi.name ASC";

/// Compiles a sort model into an `ORDER BY` clause.
pub struct SortCompiler;

impl SortCompiler {
    /// Keys compose in model order: the first is primary.
    pub fn compile(sorts: &[SortDescriptor]) -> String {
        if sorts.is_empty() {
            return DEFAULT_ORDER_BY.to_string();
        }

        let keys = sorts
            .iter()
            .map(|s| {
                format!(
                    "{} {}",
                    ColumnRegistry::resolve(&s.col_id).sql(),
                    s.sort.as_sql()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("ORDER BY {keys}, {TIE_BREAKER}")
    }
}
