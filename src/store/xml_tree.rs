use quick_xml::events::Event;
use quick_xml::Reader;

/// Element of a parsed document. Attributes are not kept, post documents
/// don't use them.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: String) -> XmlNode {
        XmlNode {
            name,
            text: String::new(),
            children: vec![],
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item=&'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parses a whole document into a tree and returns its root element. Text is
/// kept untrimmed so leaf values come back exactly as written.
pub fn parse_document(xml: &str) -> Result<XmlNode, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = vec![];
    let mut root: Option<XmlNode> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(format!("{} at position {}", e, reader.buffer_position())),
        };

        match event {
            Event::Start(e) => stack.push(XmlNode::new(element_name(e.name().as_ref())?)),
            Event::Empty(e) => {
                let node = XmlNode::new(element_name(e.name().as_ref())?);
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or("Unexpected closing element")?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                // Text outside the root element is only whitespace
                if let Some(node) = stack.last_mut() {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    node.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    let text = std::str::from_utf8(&e).map_err(|e| e.to_string())?;
                    node.text.push_str(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("Element {} is not closed", open.name));
    }

    root.ok_or_else(|| "Document has no root element".to_string())
}

fn element_name(raw: &[u8]) -> Result<String, String> {
    match std::str::from_utf8(raw) {
        Ok(name) => Ok(name.to_string()),
        Err(e) => Err(format!("Invalid element name: {}", e)),
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(format!("Second root element {}", node.name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<Post>
  <Title> Spaced &amp; escaped </Title>
  <Body><![CDATA[<p>raw</p>]]></Body>
  <Tags>
    <Tag>a</Tag>
    <Tag/>
    <Tag>b</Tag>
  </Tags>
</Post>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(root.name, "Post");
        assert_eq!(root.child("Title").unwrap().text, " Spaced & escaped ");
        assert_eq!(root.child("Body").unwrap().text, "<p>raw</p>");
        assert!(root.child("Missing").is_none());

        let tags: Vec<&str> = root.child("Tags").unwrap()
            .children_named("Tag")
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(tags, ["a", "", "b"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   ").is_err());
        assert!(parse_document("<Post><Id>1</Id>").is_err());
        assert!(parse_document("<Post><Id>1</Title></Post>").is_err());
        assert!(parse_document("<Post/><Post/>").is_err());
    }
}
