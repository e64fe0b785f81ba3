use firesight_core::error::{FiresightError, Result};

use crate::compiled::CompiledGraph;
use crate::directive::Directive;

/// Resolution of "which node runs next".
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Route {
    /// Run the named node next.
    Next(String),
    /// Execution ends.
    Terminal,
}

/// Resolve the node to run after `last`.
///
/// Pure function of (last node, directive, graph); mutates nothing.
/// Priority order:
/// 1. `Directive::End` — terminal.
/// 2. `Directive::Node(name)` — that node, if registered (dynamic routing
///    overrides static edges); `UnknownNode` otherwise.
/// 3. The static successor of `last`, if declared.
/// 4. Terminal by exhaustion — no directive and no static successor makes
///    `last` an implicit sink.
pub fn resolve(
    last: &str,
    directive: Option<&Directive>,
    graph: &CompiledGraph,
) -> Result<Route> {
    match directive {
        Some(Directive::End) => Ok(Route::Terminal),
        Some(Directive::Node(target)) => {
            if graph.contains(target) {
                Ok(Route::Next(target.clone()))
            } else {
                Err(FiresightError::UnknownNode(target.clone()))
            }
        }
        None => match graph.static_successor(last) {
            Some(next) => Ok(Route::Next(next.to_string())),
            None => Ok(Route::Terminal),
        },
    }
}
