//! Domain model (ids, stores, shopping list, catalog records, errors).

pub mod catalog;
pub mod errors;
pub mod ids;
pub mod shopping;
pub mod store;

pub use self::catalog::CatalogRecord;
pub use self::errors::{
    CoordinatorError, ErrorKind, FinalizationError, IntakeError, SetupError, StorescanError,
};
pub use self::ids::{RunId, WorkerId};
pub use self::shopping::{Rating, ShoppingItem, ShoppingList, ShoppingListError};
pub use self::store::StoreId;
