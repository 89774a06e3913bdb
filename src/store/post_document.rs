use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use uuid::Uuid;

use crate::post::{Comment, Post};
use crate::store::xml_tree::{parse_document, XmlNode};
use crate::text_utils::{format_date_time, parse_date_time};

/* Example
<?xml version="1.0" encoding="utf-8"?>
<Post>
  <Id>1</Id>
  <Slug>hello</Slug>
  <Title>Hello</Title>
  <Body>First post</Body>
  <PubDate>2022-04-02T12:05:00</PubDate>
  <LastModified>2022-04-02T12:05:00</LastModified>
  <IsPublic>true</IsPublic>
  <Excerpt>First</Excerpt>
  <Comments>
    <Comment>
      <AuthorName>thiago</AuthorName>
      <AuthorEmail>thiago@example.com</AuthorEmail>
      <PubDate>2022-04-02T13:00:00</PubDate>
      <CommentBody>Nice one</CommentBody>
      <IsPublic>true</IsPublic>
      <UniqueId>a63bd715-a3fe-4788-b0e1-2a3153778544</UniqueId>
    </Comment>
  </Comments>
  <Tags>
    <Tag>a</Tag>
  </Tags>
</Post>
*/

const POST: &str = "Post";
const ID: &str = "Id";
const SLUG: &str = "Slug";
const TITLE: &str = "Title";
const BODY: &str = "Body";
const PUB_DATE: &str = "PubDate";
const LAST_MODIFIED: &str = "LastModified";
const IS_PUBLIC: &str = "IsPublic";
const EXCERPT: &str = "Excerpt";
const COMMENTS: &str = "Comments";
const COMMENT: &str = "Comment";
const AUTHOR_NAME: &str = "AuthorName";
const AUTHOR_EMAIL: &str = "AuthorEmail";
const COMMENT_BODY: &str = "CommentBody";
const UNIQUE_ID: &str = "UniqueId";
const TAGS: &str = "Tags";
const TAG: &str = "Tag";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub fn write_post(post: &Post) -> quick_xml::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(POST)))?;

    push_text(&mut writer, ID, &post.id.to_string())?;
    push_text(&mut writer, SLUG, &post.slug)?;
    push_text(&mut writer, TITLE, &post.title)?;
    push_text(&mut writer, BODY, &post.body)?;
    push_text(&mut writer, PUB_DATE, &format_date_time(&post.pub_date))?;
    push_text(&mut writer, LAST_MODIFIED, &format_date_time(&post.last_modified))?;
    push_text(&mut writer, IS_PUBLIC, &post.is_public.to_string())?;
    push_text(&mut writer, EXCERPT, &post.excerpt)?;
    push_list(&mut writer, COMMENTS, &post.comments, push_comment)?;
    push_list(&mut writer, TAGS, &post.tags, |w, tag| push_text(w, TAG, tag))?;

    writer.write_event(Event::End(BytesEnd::new(POST)))?;

    let buf = writer.into_inner().into_inner();
    // Every piece written above came from a &str
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn push_comment(writer: &mut XmlWriter, comment: &Comment) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(COMMENT)))?;
    push_text(writer, AUTHOR_NAME, &comment.author_name)?;
    push_text(writer, AUTHOR_EMAIL, &comment.author_email)?;
    push_text(writer, PUB_DATE, &format_date_time(&comment.pub_date))?;
    push_text(writer, COMMENT_BODY, &comment.body)?;
    push_text(writer, IS_PUBLIC, &comment.is_public.to_string())?;
    push_text(writer, UNIQUE_ID, &comment.unique_id.to_string())?;
    writer.write_event(Event::End(BytesEnd::new(COMMENT)))?;
    Ok(())
}

fn push_list<T, F>(writer: &mut XmlWriter, tag: &str, items: &[T], push_item: F) -> quick_xml::Result<()>
where
    F: Fn(&mut XmlWriter, &T) -> quick_xml::Result<()>,
{
    if items.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    for item in items {
        push_item(writer, item)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_text(writer: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

pub fn read_post(xml: &str) -> Result<Post, String> {
    let root = parse_root(xml)?;

    Ok(Post {
        id: parse_field(&root, ID, |v| v.trim().parse::<i64>().map_err(|e| e.to_string()))?,
        slug: text_field(&root, SLUG)?.to_string(),
        title: text_field(&root, TITLE)?.to_string(),
        body: text_field(&root, BODY)?.to_string(),
        pub_date: parse_field(&root, PUB_DATE, parse_date_time)?,
        last_modified: parse_field(&root, LAST_MODIFIED, parse_date_time)?,
        is_public: parse_field(&root, IS_PUBLIC, parse_bool)?,
        excerpt: text_field(&root, EXCERPT)?.to_string(),
        tags: read_tag_list(&root)?,
        comments: read_comment_list(&root)?,
    })
}

/// Only the comments of a document, the rest of the post is not validated.
pub fn read_comments(xml: &str) -> Result<Vec<Comment>, String> {
    let root = parse_root(xml)?;
    read_comment_list(&root)
}

fn parse_root(xml: &str) -> Result<XmlNode, String> {
    let root = parse_document(xml)?;
    if root.name != POST {
        return Err(format!("Expected root element {}, found {}", POST, root.name));
    }
    Ok(root)
}

// Documents written before any comment existed have no Comments block
fn read_comment_list(root: &XmlNode) -> Result<Vec<Comment>, String> {
    let Some(comments) = root.child(COMMENTS) else {
        return Ok(vec![]);
    };

    comments.children_named(COMMENT)
        .map(read_comment)
        .collect()
}

fn read_comment(node: &XmlNode) -> Result<Comment, String> {
    Ok(Comment {
        author_name: text_field(node, AUTHOR_NAME)?.to_string(),
        author_email: text_field(node, AUTHOR_EMAIL)?.to_string(),
        pub_date: parse_field(node, PUB_DATE, parse_date_time)?,
        body: text_field(node, COMMENT_BODY)?.to_string(),
        is_public: parse_field(node, IS_PUBLIC, parse_bool)?,
        unique_id: parse_field(node, UNIQUE_ID, |v| Uuid::parse_str(v.trim()).map_err(|e| e.to_string()))?,
    })
}

fn read_tag_list(root: &XmlNode) -> Result<Vec<String>, String> {
    let tags = root.child(TAGS)
        .ok_or_else(|| missing(root, TAGS))?;

    Ok(tags.children_named(TAG)
        .map(|t| t.text.clone())
        .collect())
}

fn text_field<'a>(node: &'a XmlNode, name: &str) -> Result<&'a str, String> {
    node.child(name)
        .map(|c| c.text.as_str())
        .ok_or_else(|| missing(node, name))
}

fn parse_field<T, F>(node: &XmlNode, name: &str, parse: F) -> Result<T, String>
where
    F: Fn(&str) -> Result<T, String>,
{
    let value = text_field(node, name)?;
    parse(value).map_err(|e| format!("Invalid {} in {}: {}", name, node.name, e))
}

fn missing(node: &XmlNode, name: &str) -> String {
    format!("Missing element {} in {}", name, node.name)
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("{} is not a boolean", other)),
    }
}
