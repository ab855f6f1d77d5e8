//! Persistence module
//!
//! One access object per table. Each is stateless and works against the
//! connection handed in by the caller, so every call runs inside the
//! request's own database session.

mod accounts;
mod error;
mod sessions;
mod transactions;
mod users;

pub use accounts::AccountCrud;
pub use error::PersistenceError;
pub use sessions::SessionCrud;
pub use transactions::TransactionCrud;
pub use users::UserCrud;
