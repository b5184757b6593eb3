//! Domain operations and the state containers built on them.

mod auth_operations;
mod product_search;
mod session_flow;
pub(crate) mod wishlist_operations;
mod wishlist_state;

pub use auth_operations::{AuthOperations, AuthOutcome};
pub use product_search::{AnalysisOutcome, ProductSearch, SearchOutcome};
pub use session_flow::SessionService;
pub use wishlist_operations::WishlistOperations;
pub use wishlist_state::WishlistState;
