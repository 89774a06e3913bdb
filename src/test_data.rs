#![cfg(test)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::post::{Comment, Post};

pub fn date_time(y: i32, m: u32, d: u32, h: u32, mn: u32, s: u32) -> NaiveDateTime {
    NaiveDateTime::new(
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(h, mn, s).unwrap(),
    )
}

pub fn post(id: i64, tags: &[&str]) -> Post {
    Post {
        id,
        slug: format!("post-{}", id),
        title: format!("title-of-post-{}", id),
        body: format!("<p>Body of post {} & friends</p>\n\n  indented line\n", id),
        pub_date: date_time(2024, 1, 2, 5, 6, 7) + chrono::Duration::milliseconds(123),
        last_modified: date_time(2024, 1, 3, 10, 0, 0),
        is_public: true,
        excerpt: format!("summary-of-post-{}", id),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        comments: vec![],
    }
}

pub fn comment(unique_id: Uuid, body: &str) -> Comment {
    Comment {
        author_name: "thiago".to_string(),
        author_email: "thiago@example.com".to_string(),
        pub_date: date_time(2024, 2, 12, 22, 54, 0),
        body: body.to_string(),
        is_public: true,
        unique_id,
    }
}

pub const POST_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Post>
  <Id>1</Id>
  <Slug>hello</Slug>
  <Title>Hello</Title>
  <Body>First &lt;b&gt;post&lt;/b&gt;</Body>
  <PubDate>2022-04-02T12:05:00</PubDate>
  <LastModified>2022-04-03T08:00:00.500</LastModified>
  <IsPublic>true</IsPublic>
  <Excerpt>First</Excerpt>
  <Comments>
    <Comment>
      <AuthorName>thiago</AuthorName>
      <AuthorEmail>thiago@example.com</AuthorEmail>
      <PubDate>2022-04-02T13:00:00</PubDate>
      <CommentBody>Nice one</CommentBody>
      <IsPublic>false</IsPublic>
      <UniqueId>a63bd715-a3fe-4788-b0e1-2a3153778544</UniqueId>
    </Comment>
  </Comments>
  <Tags>
    <Tag>a</Tag>
    <Tag>b</Tag>
  </Tags>
</Post>"#;

/// Same post as written by the first version of the blog, en-US dates and
/// capitalised booleans, no Comments block.
pub const LEGACY_POST_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Post>
  <Id>1</Id>
  <Slug>hello</Slug>
  <Title>Hello</Title>
  <Body>First &lt;b&gt;post&lt;/b&gt;</Body>
  <PubDate>4/2/2022 12:05:00 PM</PubDate>
  <LastModified>4/3/2022 8:00:00 AM</LastModified>
  <IsPublic>True</IsPublic>
  <Excerpt>First</Excerpt>
  <Tags>
    <Tag>a</Tag>
  </Tags>
</Post>"#;
