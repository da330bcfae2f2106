//! Command implementations.

pub mod matchup;
pub mod rank;
pub mod search;

pub use self::matchup::execute_matchup;
pub use self::rank::execute_rank;
pub use self::search::execute_search;

use crate::output::Formatter;
use crate::pipeline::Prepared;

/// Print every preparation warning, then the reduction summary, to stderr.
pub(crate) fn print_warnings(prepared: &Prepared, formatter: &Formatter) {
    for warning in prepared.all_warnings() {
        eprintln!("{}", formatter.warning(warning));
    }
    if let Some(note) = formatter.reduction_note(&prepared.reduction.report) {
        eprintln!("{}", note);
    }
}
