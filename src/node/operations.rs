//! The closed set of remote actions the node can perform.

use reqwest::Method;
use serde::Serialize;

use crate::constants::api::JOB_RESULT_PATH;
use crate::errors::NodeError;
use crate::utils::operation_errors::unknown_operation_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    CheckConnection,
    GetProfileData,
    GetChatHistory,
    SendConnectionInvite,
    SendMessage,
    ListConnections,
    ScrapeProfilesFromSearch,
    ScrapeProfilesFromPostComments,
    ScrapePosts,
    InviteToFollowPage,
    GetJobResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::CheckConnection,
        Operation::GetProfileData,
        Operation::GetChatHistory,
        Operation::SendConnectionInvite,
        Operation::SendMessage,
        Operation::ListConnections,
        Operation::ScrapeProfilesFromSearch,
        Operation::ScrapeProfilesFromPostComments,
        Operation::ScrapePosts,
        Operation::InviteToFollowPage,
        Operation::GetJobResult,
    ];

    /// Identifier the host stores in the `operation` parameter.
    pub fn id(self) -> &'static str {
        match self {
            Operation::CheckConnection => "checkConnection",
            Operation::GetProfileData => "getProfileData",
            Operation::GetChatHistory => "getChatHistory",
            Operation::SendConnectionInvite => "sendConnectionInvite",
            Operation::SendMessage => "sendMessage",
            Operation::ListConnections => "listConnections",
            Operation::ScrapeProfilesFromSearch => "scrapeProfilesFromSearch",
            Operation::ScrapeProfilesFromPostComments => "scrapeProfilesFromPostComments",
            Operation::ScrapePosts => "scrapePosts",
            Operation::InviteToFollowPage => "inviteToFollowPage",
            Operation::GetJobResult => "getJobResult",
        }
    }

    /// Descriptive kebab-case name, accepted by [`resolve`] as well.
    pub fn alias(self) -> &'static str {
        match self {
            Operation::CheckConnection => "check-connection-status",
            Operation::GetProfileData => "get-profile-data",
            Operation::GetChatHistory => "get-chat-history",
            Operation::SendConnectionInvite => "send-connection-invite",
            Operation::SendMessage => "send-message",
            Operation::ListConnections => "list-connections",
            Operation::ScrapeProfilesFromSearch => "scrape-profiles-from-search",
            Operation::ScrapeProfilesFromPostComments => "scrape-profiles-from-post-comments",
            Operation::ScrapePosts => "scrape-posts",
            Operation::InviteToFollowPage => "invite-to-follow-page",
            Operation::GetJobResult => "get-job-result",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Operation::CheckConnection => "Check if a Person Is a Connection",
            Operation::GetProfileData => "Get Data From A Linkedin Profile",
            Operation::GetChatHistory => "Export LinkedIn Chat History",
            Operation::SendConnectionInvite => "Send A LinkedIn Connection Invite",
            Operation::SendMessage => "Send A LinkedIn Message",
            Operation::ListConnections => "List LinkedIn Connections",
            Operation::ScrapeProfilesFromSearch => "Scrape Profiles From A LinkedIn Search",
            Operation::ScrapeProfilesFromPostComments => "Scrape Profiles From A LinkedIn Post",
            Operation::ScrapePosts => "Scrape LinkedIn Posts",
            Operation::InviteToFollowPage => "Invite Connections to Follow a LinkedIn Page",
            Operation::GetJobResult => "Get Job Result",
        }
    }

    pub fn http_method(self) -> HttpMethod {
        match self {
            Operation::GetJobResult => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Endpoint path relative to the API base URL. `{jobId}` is filled in by
    /// [`Operation::path`].
    pub fn path_template(self) -> &'static str {
        match self {
            Operation::CheckConnection => "linkedin-check-connection-status",
            Operation::GetProfileData => "linkedin-profile-data",
            Operation::GetChatHistory => "linkedin-get-chat-history",
            Operation::SendConnectionInvite => "linkedin-connection-invite",
            Operation::SendMessage => "linkedin-send-message",
            Operation::ListConnections => "linkedin-list-connections",
            Operation::ScrapeProfilesFromSearch => "linkedin-scrape-profiles-from-search",
            Operation::ScrapeProfilesFromPostComments => {
                "linkedin-scrape-profiles-from-post-comments"
            }
            Operation::ScrapePosts => "linkedin-scrape-posts",
            Operation::InviteToFollowPage => "linkedin-invite-to-follow-page",
            Operation::GetJobResult => "linkedin-job-result/{jobId}",
        }
    }

    /// Concrete path, with the job id percent-encoded into a single segment.
    pub fn path(self, job_id: Option<&str>) -> String {
        match self {
            Operation::GetJobResult => {
                let encoded = url::form_urlencoded::byte_serialize(
                    job_id.unwrap_or("").trim().as_bytes(),
                )
                .collect::<String>()
                .replace('+', "%20");
                format!("{}/{}", JOB_RESULT_PATH, encoded)
            }
            other => other.path_template().to_string(),
        }
    }

    /// Whether the polling/callback overlay applies.
    pub fn accepts_execution_options(self) -> bool {
        !matches!(self, Operation::GetJobResult)
    }

    pub fn describe(self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id(),
            "alias": self.alias(),
            "name": self.display_name(),
            "method": self.http_method().as_str(),
            "path": self.path_template(),
            "executionOptions": self.accepts_execution_options(),
        })
    }
}

pub fn known_operation_ids() -> Vec<&'static str> {
    Operation::ALL.iter().map(|op| op.id()).collect()
}

/// Looks up an operation by its exact host id, or by its kebab alias in any
/// letter case. Surrounding whitespace is ignored.
pub fn resolve(operation_id: &str) -> Result<Operation, NodeError> {
    let wanted = operation_id.trim();
    Operation::ALL
        .into_iter()
        .find(|op| op.id() == wanted || op.alias().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| unknown_operation_error(operation_id, &known_operation_ids()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeErrorKind;

    #[test]
    fn resolves_host_ids_and_aliases() {
        assert_eq!(resolve("sendMessage").unwrap(), Operation::SendMessage);
        assert_eq!(
            resolve("check-connection-status").unwrap(),
            Operation::CheckConnection
        );
        assert_eq!(resolve("GET-JOB-RESULT").unwrap(), Operation::GetJobResult);
        assert_eq!(resolve(" scrapePosts ").unwrap(), Operation::ScrapePosts);
    }

    #[test]
    fn loose_spellings_are_not_operations() {
        for loose in ["SENDMESSAGE", "sendmessage", "send.message", "Send Message", "send_message"] {
            let err = resolve(loose).unwrap_err();
            assert_eq!(err.kind, NodeErrorKind::UnknownOperation, "{}", loose);
            assert!(err.hint.unwrap_or_default().contains("sendMessage"), "{}", loose);
        }
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = resolve("deleteAccount").unwrap_err();
        assert_eq!(err.kind, NodeErrorKind::UnknownOperation);
        let err = resolve("").unwrap_err();
        assert_eq!(err.kind, NodeErrorKind::UnknownOperation);
    }

    #[test]
    fn only_job_result_is_get() {
        for op in Operation::ALL {
            let expected = if op == Operation::GetJobResult {
                HttpMethod::Get
            } else {
                HttpMethod::Post
            };
            assert_eq!(op.http_method(), expected, "{}", op.id());
            assert_eq!(op.accepts_execution_options(), op != Operation::GetJobResult);
        }
    }

    #[test]
    fn ids_and_aliases_round_trip() {
        for op in Operation::ALL {
            assert_eq!(resolve(op.id()).unwrap(), op);
            assert_eq!(resolve(op.alias()).unwrap(), op);
        }
    }

    #[test]
    fn job_result_path_encodes_id() {
        assert_eq!(
            Operation::GetJobResult.path(Some("1201bfb7-1b5f")),
            "linkedin-job-result/1201bfb7-1b5f"
        );
        assert_eq!(
            Operation::GetJobResult.path(Some("a b/c")),
            "linkedin-job-result/a%20b%2Fc"
        );
        assert_eq!(
            Operation::ScrapePosts.path(None),
            "linkedin-scrape-posts"
        );
    }
}
