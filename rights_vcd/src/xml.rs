//! Reading and writing the XML documents behind the rights endpoints.

use std::{borrow::Cow, fmt::Write};

use quick_xml::{
    escape::escape,
    events::{attributes::Attribute, BytesDecl, BytesEnd, BytesStart, Event},
    name::QName,
    Writer,
};
use rights_core::{OrgRightsDocument, Result, Right, RightsError};

use crate::{org::OrgRef, rest::consts};

fn parse_document(data: &str) -> Result<roxmltree::Document<'_>> {
    roxmltree::Document::parse(data).map_err(|e| RightsError::Parse(e.to_string()))
}

/// Build a Right from a <RightReference> node.
fn right_from_node(node: &roxmltree::Node) -> Result<Right> {
    let attr = |name: &str| {
        node.attribute(name).ok_or_else(|| {
            RightsError::Parse(format!(
                "RightReference {} is missing its {name} attribute",
                node.attribute("name")
                    .or_else(|| node.attribute("href"))
                    .unwrap_or("<unnamed>")
            ))
        })
    };
    let mut right = Right::new(attr("href")?, attr("name")?);
    right.media_type = node.attribute("type").map(|t| t.to_owned());
    Ok(right)
}

fn right_references<'a, 'input>(
    parent: roxmltree::Node<'a, 'input>,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| n.is_element() && n.has_tag_name("RightReference"))
}

/// Parse the global rights catalog out of the admin <VCloud> document.
pub(crate) fn parse_catalog(data: &str) -> Result<Vec<Right>> {
    let doc = parse_document(data)?;
    let references = doc
        .descendants()
        .find(|n| n.has_tag_name("RightReferences"))
        .ok_or_else(|| RightsError::Parse("unable to find RightReferences".to_owned()))?;

    right_references(references)
        .map(|n| right_from_node(&n))
        .collect()
}

/// Parse an <OrgList> into the orgs it names.
pub(crate) fn parse_org_list(data: &str) -> Result<Vec<OrgRef>> {
    let doc = parse_document(data)?;
    let root = doc.root_element();
    if !root.has_tag_name("OrgList") {
        return Err(RightsError::Parse(format!(
            "expected OrgList, found {}",
            root.tag_name().name()
        )));
    }

    root.children()
        .filter(|n| n.is_element() && n.has_tag_name("Org"))
        .map(|n| {
            let name = n
                .attribute("name")
                .ok_or_else(|| RightsError::Parse("Org is missing its name".to_owned()))?;
            let href = n
                .attribute("href")
                .ok_or_else(|| RightsError::Parse(format!("Org {name} is missing its href")))?;
            OrgRef::from_href(name, href)
        })
        .collect()
}

/// Parse an <OrgRights> document.
pub(crate) fn parse_org_rights(data: &str) -> Result<OrgRightsDocument> {
    let doc = parse_document(data)?;
    let root = doc.root_element();
    if !root.has_tag_name("OrgRights") {
        return Err(RightsError::Parse(format!(
            "expected OrgRights, found {}",
            root.tag_name().name()
        )));
    }

    let rights = right_references(root)
        .map(|n| right_from_node(&n))
        .collect::<Result<Vec<_>>>()?;

    Ok(OrgRightsDocument::new(
        root.attribute("href").map(|h| h.to_owned()),
        root.attribute("type").map(|t| t.to_owned()),
        rights,
    ))
}

/// Escape a value for use inside a double-quoted attribute.
///
/// Anything outside printable ASCII becomes a numeric character
/// reference, so the output is pure ASCII.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in escape(value).chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            escaped.push(c);
        } else {
            let _ = write!(escaped, "&#{};", c as u32);
        }
    }
    escaped
}

fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    }
}

fn write_error(e: quick_xml::Error) -> RightsError {
    RightsError::Parse(format!("unable to write OrgRights: {e}"))
}

/// Serialize a document as the body of an OrgRights PUT.
///
/// Links and other read-only content the server sent are not written back;
/// the server only reads the references.
pub(crate) fn serialize_org_rights(doc: &OrgRightsDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;

    let mut root = BytesStart::new("OrgRights");
    root.push_attribute(attribute("xmlns", consts::VCLOUD_NAMESPACE));
    if let Some(href) = &doc.href {
        root.push_attribute(attribute("href", href));
    }
    root.push_attribute(attribute(
        "type",
        doc.media_type
            .as_deref()
            .unwrap_or(consts::ORG_RIGHTS_MEDIA_TYPE),
    ));
    writer
        .write_event(Event::Start(root))
        .map_err(write_error)?;

    for right in doc.rights() {
        let mut reference = BytesStart::new("RightReference");
        reference.push_attribute(attribute("href", &right.href));
        reference.push_attribute(attribute("name", &right.name));
        reference.push_attribute(attribute(
            "type",
            right
                .media_type
                .as_deref()
                .unwrap_or(consts::RIGHT_MEDIA_TYPE),
        ));
        writer
            .write_event(Event::Empty(reference))
            .map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("OrgRights")))
        .map_err(write_error)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| RightsError::Parse(format!("OrgRights body is not utf-8: {e}")))
}
