//! Request bodies for each operation.
//!
//! Every builder is a pure function of the parameter set. Field names are the
//! remote API's wire names and must not change.

use serde_json::{Map, Value};

use crate::node::operations::Operation;
use crate::node::params::RawParameters;

pub type RequestBody = Map<String, Value>;

/// Body for `op`, or `None` for operations sent without one.
pub fn build_body(op: Operation, params: &RawParameters) -> Option<RequestBody> {
    let body = match op {
        Operation::CheckConnection | Operation::GetProfileData => linkedin_url_only(params),
        Operation::GetChatHistory => chat_history(params),
        Operation::SendConnectionInvite => connection_invite(params),
        Operation::SendMessage => send_message(params),
        Operation::ListConnections => list_connections(params),
        Operation::ScrapeProfilesFromSearch => profiles_from_search(params),
        Operation::ScrapeProfilesFromPostComments => profiles_from_post_comments(params),
        Operation::ScrapePosts => scrape_posts(params),
        Operation::InviteToFollowPage => invite_to_follow_page(params),
        Operation::GetJobResult => return None,
    };
    Some(body)
}

/// Path parameter for operations addressed by job.
pub fn job_id(params: &RawParameters) -> Option<String> {
    params.get("jobId").map(display_string)
}

fn linkedin_url_only(params: &RawParameters) -> RequestBody {
    let mut body = RequestBody::new();
    body.insert("linkedinUrl".into(), params.value_or("linkedinUrl", Value::Null));
    body
}

fn chat_history(params: &RawParameters) -> RequestBody {
    let mut body = linkedin_url_only(params);
    match params.get("nrOfMessages") {
        Some(Value::String(text)) if text.is_empty() => {}
        Some(count) => {
            body.insert("nrOfMessages".into(), count.clone());
        }
        None => {}
    }
    body
}

fn connection_invite(params: &RawParameters) -> RequestBody {
    let mut body = linkedin_url_only(params);
    if params.bool_or("addMessage", false) {
        let message = params.str_or("message", "");
        if !message.is_empty() {
            body.insert("message".into(), Value::String(message.to_string()));
        }
    }
    body
}

fn send_message(params: &RawParameters) -> RequestBody {
    let mut body = linkedin_url_only(params);
    body.insert("message".into(), params.value_or("message", Value::Null));
    body
}

fn list_connections(params: &RawParameters) -> RequestBody {
    let mut body = RequestBody::new();
    body.insert("limit".into(), params.value_or("limit", Value::from(50)));
    body.insert("offset".into(), params.value_or("offset", Value::from(0)));
    body.insert(
        "filter".into(),
        params.value_or("filter", Value::from("recently added")),
    );
    body
}

fn scrape_posts(params: &RawParameters) -> RequestBody {
    let mut body = RequestBody::new();
    body.insert("limit".into(), params.value_or("limit", Value::from(50)));
    body.insert("offset".into(), params.value_or("offset", Value::from(0)));
    body.insert("linkedinUrl".into(), params.value_or("linkedinUrl", Value::Null));
    body
}

/// Search by filters sends every field; search by URL drops the filter
/// fields entirely, the remote side rejects them next to a URL.
fn profiles_from_search(params: &RawParameters) -> RequestBody {
    let mut body = RequestBody::new();
    body.insert("category".into(), params.value_or("category", Value::Null));
    body.insert("searchTerm".into(), params.value_or("searchTerm", Value::from("")));
    body.insert("searchUrl".into(), params.value_or("searchUrl", Value::from("")));
    body.insert("startPage".into(), params.value_or("startPage", Value::from(1)));
    body.insert("nrOfPages".into(), params.value_or("nrOfPages", Value::from(1)));
    body.insert("city".into(), params.value_or("city", Value::from("")));
    body.insert("country".into(), params.value_or("country", Value::from("")));

    if params.str_or("searchMethod", "filters") == "url" {
        for key in ["category", "searchTerm", "city", "country"] {
            body.remove(key);
        }
    }
    body
}

/// Wire names are snake_case here. Offsets and limits go out even when the
/// matching `add_*` flag is off.
fn profiles_from_post_comments(params: &RawParameters) -> RequestBody {
    let mut body = RequestBody::new();
    body.insert("postUrl".into(), params.value_or("postUrl", Value::Null));
    body.insert(
        "add_comments".into(),
        Value::Bool(params.bool_or("addComments", false)),
    );
    body.insert(
        "comments_offset".into(),
        params.value_or("commentsOffset", Value::from(0)),
    );
    body.insert(
        "comments_limit".into(),
        params.value_or("commentsLimit", Value::from(10)),
    );
    body.insert(
        "add_reactions".into(),
        Value::Bool(params.bool_or("addReactions", false)),
    );
    body.insert(
        "reactions_offset".into(),
        params.value_or("reactionsOffset", Value::from(0)),
    );
    body.insert(
        "reactions_limit".into(),
        params.value_or("reactionsLimit", Value::from(10)),
    );
    body
}

fn invite_to_follow_page(params: &RawParameters) -> RequestBody {
    let search_term = if params.str_or("searchMethod", "term") == "term" {
        params.str_or("searchTerm", "").to_string()
    } else {
        String::new()
    };

    let mut body = RequestBody::new();
    body.insert("linkedinUrl".into(), params.value_or("linkedinUrl", Value::Null));
    body.insert("maxToInvite".into(), params.value_or("maxToInvite", Value::from(10)));
    body.insert("searchTerm".into(), Value::String(search_term));
    for filter in ["locations", "schools", "currentCompany", "industries"] {
        let values = to_string_list(params.get(&format!("filters.{}", filter)));
        body.insert(
            filter.into(),
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }
    body
}

/// Coerces a filter value into a list: absent → empty, a list keeps its
/// truthy entries, a non-blank string becomes a one-element list.
/// Non-string list entries are rendered as text (`42` becomes `"42"`), so
/// the result is always a list of strings.
pub fn to_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| is_truthy(item))
            .map(display_string)
            .collect(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(_) => Vec::new(),
    }
}

/// JavaScript-style truthiness, the host's notion of "set".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0 && !v.is_nan()).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(body: &RequestBody) -> Vec<&str> {
        let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn params(value: Value) -> RawParameters {
        RawParameters::from_value(&value)
    }

    #[test]
    fn url_only_operations_forward_linkedin_url() {
        let p = params(json!({ "linkedinUrl": "https://www.linkedin.com/in/jane" }));
        for op in [Operation::CheckConnection, Operation::GetProfileData] {
            let body = build_body(op, &p).unwrap();
            assert_eq!(Value::Object(body), json!({ "linkedinUrl": "https://www.linkedin.com/in/jane" }));
        }
    }

    #[test]
    fn chat_history_omits_blank_message_count() {
        let blank = params(json!({ "linkedinUrl": "u", "nrOfMessages": "" }));
        let body = build_body(Operation::GetChatHistory, &blank).unwrap();
        assert_eq!(keys(&body), vec!["linkedinUrl"]);

        let counted = params(json!({ "linkedinUrl": "u", "nrOfMessages": 25 }));
        let body = build_body(Operation::GetChatHistory, &counted).unwrap();
        assert_eq!(body["nrOfMessages"], json!(25));
    }

    #[test]
    fn invite_message_requires_flag_and_text() {
        let flagged = params(json!({ "linkedinUrl": "u", "addMessage": true, "message": "Hi!" }));
        let body = build_body(Operation::SendConnectionInvite, &flagged).unwrap();
        assert_eq!(body["message"], json!("Hi!"));

        let unflagged = params(json!({ "linkedinUrl": "u", "addMessage": false, "message": "Hi!" }));
        let body = build_body(Operation::SendConnectionInvite, &unflagged).unwrap();
        assert_eq!(keys(&body), vec!["linkedinUrl"]);

        let empty = params(json!({ "linkedinUrl": "u", "addMessage": true, "message": "" }));
        let body = build_body(Operation::SendConnectionInvite, &empty).unwrap();
        assert_eq!(keys(&body), vec!["linkedinUrl"]);
    }

    #[test]
    fn send_message_forwards_both_fields() {
        let p = params(json!({ "linkedinUrl": "u", "message": "Hello" }));
        let body = build_body(Operation::SendMessage, &p).unwrap();
        assert_eq!(Value::Object(body), json!({ "linkedinUrl": "u", "message": "Hello" }));
    }

    #[test]
    fn list_and_posts_always_carry_paging() {
        let p = params(json!({ "limit": 5, "offset": 10, "filter": "last name" }));
        let body = build_body(Operation::ListConnections, &p).unwrap();
        assert_eq!(Value::Object(body), json!({ "limit": 5, "offset": 10, "filter": "last name" }));

        let p = params(json!({ "limit": 3, "offset": 0, "linkedinUrl": "u" }));
        let body = build_body(Operation::ScrapePosts, &p).unwrap();
        assert_eq!(keys(&body), vec!["limit", "linkedinUrl", "offset"]);
    }

    #[test]
    fn search_by_url_drops_filter_fields() {
        let p = params(json!({
            "searchMethod": "url",
            "searchUrl": "https://www.linkedin.com/search/results/people/?keywords=rust",
            "category": "persons",
            "searchTerm": "rust",
            "city": "Amsterdam",
            "country": "NL",
            "startPage": 2,
            "nrOfPages": 3,
        }));
        let body = build_body(Operation::ScrapeProfilesFromSearch, &p).unwrap();
        assert_eq!(keys(&body), vec!["nrOfPages", "searchUrl", "startPage"]);
        assert_eq!(body["startPage"], json!(2));
    }

    #[test]
    fn search_by_filters_keeps_all_fields() {
        let p = params(json!({
            "searchMethod": "filters",
            "category": "companies",
            "searchTerm": "rust",
            "startPage": 1,
            "nrOfPages": 1,
        }));
        let body = build_body(Operation::ScrapeProfilesFromSearch, &p).unwrap();
        assert_eq!(
            keys(&body),
            vec!["category", "city", "country", "nrOfPages", "searchTerm", "searchUrl", "startPage"]
        );
        assert_eq!(body["searchUrl"], json!(""));
    }

    #[test]
    fn post_comments_use_snake_case_wire_names() {
        let p = params(json!({ "postUrl": "p", "addComments": true, "commentsLimit": 30 }));
        let body = build_body(Operation::ScrapeProfilesFromPostComments, &p).unwrap();
        assert_eq!(
            Value::Object(body),
            json!({
                "postUrl": "p",
                "add_comments": true,
                "comments_offset": 0,
                "comments_limit": 30,
                "add_reactions": false,
                "reactions_offset": 0,
                "reactions_limit": 10,
            })
        );
    }

    #[test]
    fn follow_page_filters_are_always_lists() {
        let p = params(json!({
            "linkedinUrl": "https://www.linkedin.com/company/acme",
            "maxToInvite": 5,
            "searchMethod": "filters",
            "searchTerm": "ignored",
            "filters": {
                "locations": "Amsterdam",
                "schools": null,
                "currentCompany": ["Tesla", "", null],
                "industries": 42,
            },
        }));
        let body = build_body(Operation::InviteToFollowPage, &p).unwrap();
        assert_eq!(body["searchTerm"], json!(""));
        assert_eq!(body["locations"], json!(["Amsterdam"]));
        assert_eq!(body["schools"], json!([]));
        assert_eq!(body["currentCompany"], json!(["Tesla"]));
        assert_eq!(body["industries"], json!([]));
    }

    #[test]
    fn follow_page_term_search_keeps_term() {
        let p = params(json!({ "linkedinUrl": "u", "searchMethod": "term", "searchTerm": "Content Marketeer" }));
        let body = build_body(Operation::InviteToFollowPage, &p).unwrap();
        assert_eq!(body["searchTerm"], json!("Content Marketeer"));
        assert_eq!(body["maxToInvite"], json!(10));
        assert_eq!(body["locations"], json!([]));
    }

    #[test]
    fn job_result_has_no_body() {
        let p = params(json!({ "jobId": "1201bfb7" }));
        assert!(build_body(Operation::GetJobResult, &p).is_none());
        assert_eq!(job_id(&p).as_deref(), Some("1201bfb7"));
    }

    #[test]
    fn assembly_is_repeatable() {
        let p = params(json!({
            "linkedinUrl": "u",
            "searchMethod": "filters",
            "filters": { "locations": ["A", "B"] },
        }));
        for op in Operation::ALL {
            let first = build_body(op, &p).map(|b| serde_json::to_string(&b).unwrap());
            let second = build_body(op, &p).map(|b| serde_json::to_string(&b).unwrap());
            assert_eq!(first, second, "{}", op.id());
        }
    }
}
