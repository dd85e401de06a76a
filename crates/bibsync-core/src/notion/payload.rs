//! Notion request bodies and response parsing

use serde::Deserialize;
use serde_json::{json, Value};

use super::{PageFields, PageId};

/// Title property used as the primary key of the database
pub(crate) const REFERENCE_ID_PROPERTY: &str = "Reference ID";

/// Rich-text property value
fn rich_text(content: &str) -> Value {
    json!({
        "rich_text": [{
            "type": "text",
            "text": { "content": content }
        }]
    })
}

/// Property map for a page; every field is always present
pub(crate) fn page_properties(fields: &PageFields) -> Value {
    json!({
        REFERENCE_ID_PROPERTY: {
            "title": [{
                "text": { "content": fields.reference_id }
            }]
        },
        "Authors": rich_text(&fields.authors),
        "Year": rich_text(&fields.year),
        "Title": rich_text(&fields.title),
        "Item type": {
            "select": { "name": fields.item_type }
        },
    })
}

/// Body for `POST /pages`
pub(crate) fn create_body(database_id: &str, fields: &PageFields) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": page_properties(fields),
    })
}

/// Body for `PATCH /pages/{id}`
pub(crate) fn update_body(fields: &PageFields) -> Value {
    json!({ "properties": page_properties(fields) })
}

/// Body for `POST /databases/{id}/query`
pub(crate) fn query_body(reference_id: &str) -> Value {
    json!({
        "page_size": 1,
        "filter": {
            "property": REFERENCE_ID_PROPERTY,
            "title": { "equals": reference_id },
        },
    })
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<PageObject>,
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
}

/// Error object returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Why a response body could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BodyError {
    /// Parsed, but no page matched
    Empty,
    Malformed(String),
}

/// First page id of a database query response
pub(crate) fn parse_query_response(body: &str) -> Result<PageId, BodyError> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| BodyError::Malformed(format!("Invalid query response: {}", e)))?;

    response
        .results
        .into_iter()
        .next()
        .map(|page| PageId(page.id))
        .ok_or(BodyError::Empty)
}

/// Page id of a created or updated page
pub(crate) fn parse_page_response(body: &str) -> Result<PageId, BodyError> {
    let page: PageObject = serde_json::from_str(body)
        .map_err(|e| BodyError::Malformed(format!("Invalid page response: {}", e)))?;
    Ok(PageId(page.id))
}

/// Human-readable summary of an error response
pub(crate) fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            code: Some(code),
            message: Some(message),
        }) => format!("HTTP {} ({}): {}", status, code, message),
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => format!("HTTP {}: {}", status, message),
        _ => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PageFields {
        PageFields {
            reference_id: "smith2020".to_string(),
            title: "A Study".to_string(),
            authors: "Smith, J.; Doe, A.".to_string(),
            year: "2020".to_string(),
            item_type: "article".to_string(),
        }
    }

    #[test]
    fn test_create_body_shape() {
        let body = create_body("db123", &fields());

        assert_eq!(body["parent"]["database_id"], "db123");
        let props = &body["properties"];
        assert_eq!(
            props["Reference ID"]["title"][0]["text"]["content"],
            "smith2020"
        );
        assert_eq!(
            props["Authors"]["rich_text"][0]["text"]["content"],
            "Smith, J.; Doe, A."
        );
        assert_eq!(props["Authors"]["rich_text"][0]["type"], "text");
        assert_eq!(props["Year"]["rich_text"][0]["text"]["content"], "2020");
        assert_eq!(props["Title"]["rich_text"][0]["text"]["content"], "A Study");
        assert_eq!(props["Item type"]["select"]["name"], "article");
    }

    #[test]
    fn test_update_body_resends_every_property() {
        let body = update_body(&fields());
        assert!(body.get("parent").is_none());

        let props = body["properties"].as_object().unwrap();
        let mut names: Vec<_> = props.keys().cloned().collect();
        names.sort();
        assert_eq!(
            names,
            vec!["Authors", "Item type", "Reference ID", "Title", "Year"]
        );
    }

    #[test]
    fn test_query_body_filters_on_reference_id() {
        let body = query_body("smith2020");
        assert_eq!(body["page_size"], 1);
        assert_eq!(body["filter"]["property"], "Reference ID");
        assert_eq!(body["filter"]["title"]["equals"], "smith2020");
    }

    #[test]
    fn test_parse_query_response_first_match() {
        let body = r#"{"object":"list","results":[{"object":"page","id":"p-1"},{"id":"p-2"}]}"#;
        assert_eq!(parse_query_response(body), Ok(PageId("p-1".to_string())));
    }

    #[test]
    fn test_parse_query_response_empty() {
        assert_eq!(
            parse_query_response(r#"{"object":"list","results":[]}"#),
            Err(BodyError::Empty)
        );
    }

    #[test]
    fn test_parse_query_response_missing_keys() {
        assert!(matches!(
            parse_query_response(r#"{"object":"list"}"#),
            Err(BodyError::Malformed(_))
        ));
        assert!(matches!(
            parse_query_response(r#"{"results":[{"object":"page"}]}"#),
            Err(BodyError::Malformed(_))
        ));
        assert!(matches!(
            parse_query_response("<html>Bad Gateway</html>"),
            Err(BodyError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_page_response() {
        assert_eq!(
            parse_page_response(r#"{"object":"page","id":"new-page"}"#),
            Ok(PageId("new-page".to_string()))
        );
    }

    #[test]
    fn test_describe_error() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"Year is not a property"}"#;
        assert_eq!(
            describe_error(400, body),
            "HTTP 400 (validation_error): Year is not a property"
        );
        assert_eq!(describe_error(502, "gateway"), "HTTP 502");
    }
}
