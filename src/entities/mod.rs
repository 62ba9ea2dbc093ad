pub mod category;
pub mod comment;
pub mod fundraiser;
pub mod session;
pub mod static_page;
pub mod transaction;
pub mod user;

pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use fundraiser::Entity as Fundraiser;
pub use session::Entity as Session;
pub use static_page::Entity as StaticPage;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;

/// Stamp `created_at` on insert and `updated_at` on every write.
pub(crate) fn touch(
    created_at: &mut ActiveValue<DateTime<Utc>>,
    updated_at: &mut ActiveValue<DateTime<Utc>>,
    insert: bool,
) {
    let now = Utc::now();
    if insert && created_at.is_not_set() {
        *created_at = ActiveValue::Set(now);
    }
    *updated_at = ActiveValue::Set(now);
}
