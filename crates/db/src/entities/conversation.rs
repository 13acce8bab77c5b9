//! Conversation entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A buyer/seller conversation about one listing.
///
/// The id is deterministic: `"{listing_id}_{lo}_{hi}"` with the two
/// participant ids sorted, so the same pair on the same listing always
/// lands on the same row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "conversation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The listing the conversation is about. The listing may have been
    /// deleted since; readers render a removed-listing placeholder.
    pub listing_id: String,

    /// Participant with the lexicographically smaller id.
    pub participant_lo_id: String,

    /// Participant with the lexicographically larger id.
    pub participant_hi_id: String,

    /// Preview of the most recent message.
    #[sea_orm(column_type = "Text")]
    pub last_message: String,

    pub last_message_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Build the deterministic conversation id for a listing and two
    /// participants, in either order.
    #[must_use]
    pub fn conversation_id(listing_id: &str, a: &str, b: &str) -> String {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        format!("{listing_id}_{lo}_{hi}")
    }

    /// Whether `user_id` participates in this conversation.
    #[must_use]
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_lo_id == user_id || self.participant_hi_id == user_id
    }

    /// The other participant's id, if `user_id` is one of the two.
    #[must_use]
    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        if self.participant_lo_id == user_id {
            Some(&self.participant_hi_id)
        } else if self.participant_hi_id == user_id {
            Some(&self.participant_lo_id)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_is_order_independent() {
        let a = Model::conversation_id("l1", "user_b", "user_a");
        let b = Model::conversation_id("l1", "user_a", "user_b");
        assert_eq!(a, b);
        assert_eq!(a, "l1_user_a_user_b");
    }
}
