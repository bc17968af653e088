//! Tree scanning - full scans, change-driven re-scans and rescaling.

mod applier;
mod dispatcher;
mod rescale;
mod scanner;

pub use applier::apply_matches;
pub use dispatcher::{ChangeDispatcher, DispatchReport};
pub use rescale::rescale_converted;
pub use scanner::{ScanReport, Scanner};
