//! Lab members

use serde::Serialize;
use sqlx::FromRow;

/// Member as stored in the `members` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub research: String,
    pub email: String,
    /// Upload path relative to the public mount, or empty
    pub image: String,
}

/// Field values for a member that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub position: String,
    pub research: String,
    pub email: String,
    pub image: String,
}

impl NewMember {
    /// Attach the stored upload path returned by the upload handler.
    pub fn with_image(mut self, image: String) -> Self {
        self.image = image;
        self
    }

    pub(crate) fn into_member(self, id: i64) -> Member {
        Member {
            id,
            name: self.name,
            position: self.position,
            research: self.research,
            email: self.email,
            image: self.image,
        }
    }
}
