//! Access predicates. Each is a pure function of the caller and the resource.

use super::Identity;
use crate::entities::fundraiser;

/// Login and registration pages are for anonymous visitors only.
pub fn can_authenticate_only(identity: &Identity) -> bool {
    identity.is_anonymous()
}

/// Only the owner may edit a fundraiser.
pub fn is_owner(identity: &Identity, fundraiser: &fundraiser::Model) -> bool {
    identity.id().is_some_and(|id| id == fundraiser.owner_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user;
    use chrono::Utc;

    fn member(id: i32) -> Identity {
        Identity::User(user::Model {
            id,
            username: format!("test{}@example.com", id),
            email: format!("test{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        })
    }

    fn owned_by(owner_id: i32) -> fundraiser::Model {
        let now = Utc::now();
        fundraiser::Model {
            id: 10,
            name: "School trip".to_string(),
            slug: "school-trip".to_string(),
            description: String::new(),
            purpose: 500,
            active: true,
            category_id: 1,
            owner_id,
            start_date: now,
            end_date: now,
            votes_positive: 0,
            votes_negative: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_anonymous_visitors_may_authenticate() {
        assert!(can_authenticate_only(&Identity::Anonymous));
        assert!(!can_authenticate_only(&member(1)));
    }

    #[test]
    fn ownership_matches_on_user_id() {
        let fundraiser = owned_by(1);
        assert!(is_owner(&member(1), &fundraiser));
        assert!(!is_owner(&member(2), &fundraiser));
        assert!(!is_owner(&Identity::Anonymous, &fundraiser));
    }
}
