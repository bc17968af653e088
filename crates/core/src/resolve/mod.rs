//! Cross-segment resolution.
//!
//! A segment holding only a currency marker (`$`, `USD`, `Dollars`) gets its
//! amount from a neighbouring segment. Neighbours are tried in a fixed order:
//!
//! ```text
//!   <p>                       right side (short markers only)
//!     <span>$</span>            1. parent's next sibling, a text segment
//!     6                         2. first child of the parent's next sibling
//!     <b>66</b>                 3. first child of the marker's next sibling
//!   </p>                      left side: the same three, mirrored
//! ```
//!
//! The first tier with an eligible candidate wins; later tiers are never
//! looked at, even when conversion of that candidate fails.

mod resolver;
mod tiers;

pub use resolver::resolve;
pub use tiers::{Anchor, Side, Target, Tier, TIERS};
