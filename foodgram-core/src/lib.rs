pub mod error;
pub mod image;
pub mod membership;
pub mod pagination;
pub mod search;
pub mod shopping_list;
pub mod short_link;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod validation;

pub use error::{MembershipError, ShortLinkError, StoreError, SubscriptionError, ValidationErrors};
pub use pagination::{PageLinks, PageRequest, DEFAULT_PAGE_SIZE};
pub use shopping_list::{aggregate, build_shopping_list, render_shopping_list, ShoppingListOrder};
pub use store::{MembershipStore, MemoryStore, SubscriptionStore};
pub use types::{IngredientLine, MembershipKind, RecipeLines, ShoppingListEntry};
pub use validation::{IngredientAmount, RecipeDraft, SignupDraft};
