//! OEM wire-format payloads.
//!
//! Field spellings vary between EM releases (`targetId` vs `id`, `type` vs
//! `typeName`), so the raw rows accept both and normalization produces the
//! canonical protocol shape.

use emscope_protocol::{Target, TargetType};
use serde::Deserialize;

/// One raw catalog row as returned by `GET /targets`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTarget {
    #[serde(alias = "targetId")]
    pub id: String,
    pub name: String,
    #[serde(rename = "typeName", alias = "type")]
    pub type_name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl RawTarget {
    /// Canonical catalog record; a missing display name falls back to the
    /// target name.
    pub fn normalize(&self) -> Target {
        Target {
            id: self.id.clone(),
            name: self.name.clone(),
            type_name: TargetType::from(self.type_name.as_str()),
            display_name: Some(
                self.display_name
                    .clone()
                    .unwrap_or_else(|| self.name.clone()),
            ),
        }
    }
}

/// Hypermedia links of a catalog page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<PageLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageLink {
    pub href: String,
}

/// One page of `GET /targets`.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetsPage {
    #[serde(default)]
    pub items: Vec<RawTarget>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

impl TargetsPage {
    /// Page token for the next page, extracted from the `next` link's `page`
    /// query parameter. `None` ends pagination.
    pub fn next_page_token(&self) -> Result<Option<String>, url::ParseError> {
        let href = match self.links.as_ref().and_then(|links| links.next.as_ref()) {
            Some(link) => &link.href,
            None => return Ok(None),
        };
        let parsed = url::Url::parse(href)?;
        let token = parsed
            .query_pairs()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_rows_accept_both_field_spellings() {
        let modern: RawTarget = serde_json::from_value(serde_json::json!({
            "targetId": "t1",
            "name": "ap1",
            "type": "rac_database"
        }))
        .unwrap();
        assert_eq!(modern.id, "t1");
        assert_eq!(modern.type_name, "rac_database");

        let legacy: RawTarget = serde_json::from_value(serde_json::json!({
            "id": "t2",
            "name": "host1",
            "typeName": "host",
            "displayName": "Host One"
        }))
        .unwrap();
        assert_eq!(legacy.id, "t2");

        let target = legacy.normalize();
        assert_eq!(target.type_name, TargetType::Host);
        assert_eq!(target.display_name.as_deref(), Some("Host One"));

        let target = modern.normalize();
        assert_eq!(target.display_name.as_deref(), Some("ap1"));
    }

    #[test]
    fn next_page_token_extraction() {
        let page: TargetsPage = serde_json::from_value(serde_json::json!({
            "items": [],
            "links": {"next": {"href": "https://em.example.com/em/api/targets?limit=2000&page=abc123"}}
        }))
        .unwrap();
        assert_eq!(page.next_page_token().unwrap().as_deref(), Some("abc123"));

        let last: TargetsPage = serde_json::from_value(serde_json::json!({"items": []})).unwrap();
        assert_eq!(last.next_page_token().unwrap(), None);

        let no_token: TargetsPage = serde_json::from_value(serde_json::json!({
            "items": [],
            "links": {"next": {"href": "https://em.example.com/em/api/targets?limit=2000"}}
        }))
        .unwrap();
        assert_eq!(no_token.next_page_token().unwrap(), None);
    }
}
