use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub author_name: String,
    pub author_email: String,
    pub pub_date: NaiveDateTime,
    pub body: String,
    pub is_public: bool,
    pub unique_id: Uuid,
}

/// A blog entry. The id is also the key of the file holding it, so two posts
/// sharing an id overwrite each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub pub_date: NaiveDateTime,
    pub last_modified: NaiveDateTime,
    pub is_public: bool,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
}

impl Post {
    /// Comment ids are assigned by the caller; the first match wins.
    pub fn find_comment(&self, unique_id: &Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.unique_id == unique_id)
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, date={}, public={}\ntitle={}\ntags={}\ncomments={}",
               self.id,
               self.slug,
               self.pub_date,
               self.is_public,
               self.title,
               self.tags.join(" "),
               self.comments.len(),
        )
    }
}
