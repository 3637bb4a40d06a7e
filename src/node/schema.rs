//! Static field declarations for each operation.
//!
//! This is what a host renders as the node's form: names, kinds, defaults,
//! and which discriminator values make a field visible. Wire assembly lives
//! in [`crate::node::assembler`] and never reads this table; the only
//! runtime use is [`resolve_parameters`], which fills declared defaults and
//! reports missing required fields before a request is built.

use serde::Serialize;
use serde_json::Value;

use crate::node::operations::Operation;
use crate::node::params::RawParameters;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "options")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Options(&'static [&'static str]),
    StringList,
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    None,
    Str(&'static str),
    Number(i64),
    Bool(bool),
    EmptyList,
    EmptyCollection,
}

impl FieldDefault {
    fn to_value(self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Str(text) => Some(Value::String(text.to_string())),
            FieldDefault::Number(n) => Some(Value::from(n)),
            FieldDefault::Bool(flag) => Some(Value::Bool(flag)),
            FieldDefault::EmptyList => Some(Value::Array(Vec::new())),
            FieldDefault::EmptyCollection => Some(Value::Object(serde_json::Map::new())),
        }
    }
}

/// Visible only while `field` holds one of `values` (booleans as
/// `"true"`/`"false"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShowWhen {
    pub field: &'static str,
    pub values: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    pub show: &'static [ShowWhen],
}

const fn field(name: &'static str, display_name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        display_name,
        kind,
        default: FieldDefault::None,
        required: false,
        min_value: None,
        show: &[],
    }
}

impl FieldSpec {
    const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn min(mut self, value: i64) -> Self {
        self.min_value = Some(value);
        self
    }

    const fn show(mut self, show: &'static [ShowWhen]) -> Self {
        self.show = show;
        self
    }

    /// Required text fields count as unset when blank.
    fn is_filled(&self, value: Option<&Value>) -> bool {
        match value {
            None => false,
            Some(Value::String(text)) if self.required && self.kind == FieldKind::String => {
                !text.trim().is_empty()
            }
            Some(_) => true,
        }
    }

    pub fn is_visible(&self, params: &RawParameters) -> bool {
        self.show.iter().all(|cond| {
            let current = params.get(cond.field).map(render_discriminator);
            match current {
                Some(current) => cond.values.contains(&current.as_str()),
                None => false,
            }
        })
    }
}

fn render_discriminator(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

const LINKEDIN_URL: FieldSpec =
    field("linkedinUrl", "LinkedIn URL", FieldKind::String).required();

const WHEN_ADD_MESSAGE: &[ShowWhen] = &[ShowWhen { field: "addMessage", values: &["true"] }];
const WHEN_SEARCH_FILTERS: &[ShowWhen] =
    &[ShowWhen { field: "searchMethod", values: &["filters"] }];
const WHEN_SEARCH_URL: &[ShowWhen] = &[ShowWhen { field: "searchMethod", values: &["url"] }];
const WHEN_SEARCH_TERM: &[ShowWhen] = &[ShowWhen { field: "searchMethod", values: &["term"] }];
const WHEN_ADD_COMMENTS: &[ShowWhen] = &[ShowWhen { field: "addComments", values: &["true"] }];
const WHEN_ADD_REACTIONS: &[ShowWhen] =
    &[ShowWhen { field: "addReactions", values: &["true"] }];
const WHEN_POLLING: &[ShowWhen] =
    &[ShowWhen { field: "execution.use_polling", values: &["true"] }];

const CHECK_CONNECTION: &[FieldSpec] = &[LINKEDIN_URL];

const GET_PROFILE_DATA: &[FieldSpec] = &[LINKEDIN_URL];

const GET_CHAT_HISTORY: &[FieldSpec] = &[
    LINKEDIN_URL,
    field("nrOfMessages", "Number of Messages", FieldKind::Number).with_default(FieldDefault::Str("")),
];

const SEND_CONNECTION_INVITE: &[FieldSpec] = &[
    LINKEDIN_URL,
    field("addMessage", "Add Message", FieldKind::Boolean).with_default(FieldDefault::Bool(false)),
    field("message", "Message", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_ADD_MESSAGE),
];

const SEND_MESSAGE: &[FieldSpec] = &[
    LINKEDIN_URL,
    field("message", "Message", FieldKind::String).required(),
];

const LIST_CONNECTIONS: &[FieldSpec] = &[
    field("limit", "Limit", FieldKind::Number)
        .with_default(FieldDefault::Number(50))
        .min(1),
    field("offset", "Offset", FieldKind::Number).with_default(FieldDefault::Number(0)),
    field(
        "filter",
        "Filter",
        FieldKind::Options(&["recently added", "first name", "last name"]),
    )
    .with_default(FieldDefault::Str("recently added")),
];

const SCRAPE_PROFILES_FROM_SEARCH: &[FieldSpec] = &[
    field("searchMethod", "Search Method", FieldKind::Options(&["filters", "url"]))
        .with_default(FieldDefault::Str("filters")),
    field("category", "Category", FieldKind::Options(&["persons", "companies"]))
        .with_default(FieldDefault::Str("persons"))
        .show(WHEN_SEARCH_FILTERS),
    field("searchUrl", "Search URL", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_SEARCH_URL),
    field("searchTerm", "Search Term", FieldKind::String)
        .required()
        .show(WHEN_SEARCH_FILTERS),
    field("city", "City", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_SEARCH_FILTERS),
    field("country", "Country", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_SEARCH_FILTERS),
    field("startPage", "Start Page", FieldKind::Number).with_default(FieldDefault::Number(1)),
    field("nrOfPages", "Number of Pages", FieldKind::Number).with_default(FieldDefault::Number(1)),
];

const SCRAPE_PROFILES_FROM_POST_COMMENTS: &[FieldSpec] = &[
    field("postUrl", "Post URL", FieldKind::String).required(),
    field("addComments", "Add Comments", FieldKind::Boolean).with_default(FieldDefault::Bool(false)),
    field("commentsOffset", "Comments Offset", FieldKind::Number)
        .with_default(FieldDefault::Number(0))
        .show(WHEN_ADD_COMMENTS),
    field("commentsLimit", "Comments Limit", FieldKind::Number)
        .with_default(FieldDefault::Number(10))
        .show(WHEN_ADD_COMMENTS),
    field("addReactions", "Add Reactions", FieldKind::Boolean).with_default(FieldDefault::Bool(false)),
    field("reactionsOffset", "Reactions Offset", FieldKind::Number)
        .with_default(FieldDefault::Number(0))
        .show(WHEN_ADD_REACTIONS),
    field("reactionsLimit", "Reactions Limit", FieldKind::Number)
        .with_default(FieldDefault::Number(10))
        .show(WHEN_ADD_REACTIONS),
];

const SCRAPE_POSTS: &[FieldSpec] = &[
    field("limit", "Limit", FieldKind::Number)
        .with_default(FieldDefault::Number(50))
        .min(1),
    field("offset", "Offset", FieldKind::Number).with_default(FieldDefault::Number(0)),
    LINKEDIN_URL,
];

const INVITE_TO_FOLLOW_PAGE: &[FieldSpec] = &[
    LINKEDIN_URL,
    field("maxToInvite", "Max Number of Connections to Invite", FieldKind::Number)
        .with_default(FieldDefault::Number(10))
        .required(),
    field("searchMethod", "Search Method", FieldKind::Options(&["term", "filters"]))
        .with_default(FieldDefault::Str("term")),
    field("searchTerm", "Search Term", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_SEARCH_TERM),
    field("filters", "Filters", FieldKind::Collection)
        .with_default(FieldDefault::EmptyCollection)
        .show(WHEN_SEARCH_FILTERS),
];

const GET_JOB_RESULT: &[FieldSpec] = &[field("jobId", "Job ID", FieldKind::String).required()];

/// Members of the `filters` collection of invite-to-follow-page.
pub const FOLLOW_PAGE_FILTERS: &[FieldSpec] = &[
    field("currentCompany", "Current Company", FieldKind::StringList)
        .with_default(FieldDefault::EmptyList),
    field("locations", "Location", FieldKind::StringList).with_default(FieldDefault::EmptyList),
    field("industries", "Industry", FieldKind::StringList).with_default(FieldDefault::EmptyList),
    field("schools", "School", FieldKind::StringList).with_default(FieldDefault::EmptyList),
];

/// Members of the `execution` collection shared by every operation except
/// get-job-result.
pub const EXECUTION_OPTIONS: &[FieldSpec] = &[
    field("use_polling", "Schedule as a Job (Polling)", FieldKind::Boolean)
        .with_default(FieldDefault::Bool(false)),
    field("callback_url", "Callback URL", FieldKind::String)
        .with_default(FieldDefault::Str(""))
        .show(WHEN_POLLING),
];

pub fn fields(op: Operation) -> &'static [FieldSpec] {
    match op {
        Operation::CheckConnection => CHECK_CONNECTION,
        Operation::GetProfileData => GET_PROFILE_DATA,
        Operation::GetChatHistory => GET_CHAT_HISTORY,
        Operation::SendConnectionInvite => SEND_CONNECTION_INVITE,
        Operation::SendMessage => SEND_MESSAGE,
        Operation::ListConnections => LIST_CONNECTIONS,
        Operation::ScrapeProfilesFromSearch => SCRAPE_PROFILES_FROM_SEARCH,
        Operation::ScrapeProfilesFromPostComments => SCRAPE_PROFILES_FROM_POST_COMMENTS,
        Operation::ScrapePosts => SCRAPE_POSTS,
        Operation::InviteToFollowPage => INVITE_TO_FOLLOW_PAGE,
        Operation::GetJobResult => GET_JOB_RESULT,
    }
}

/// Why a parameter set could not be resolved. Rendered into the caught
/// value that the error normalizer reads.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterIssue {
    Missing { name: &'static str },
    BelowMinimum { name: &'static str, min: i64 },
}

impl ParameterIssue {
    pub fn message(&self) -> String {
        match self {
            ParameterIssue::Missing { name } => {
                format!("Could not get parameter \"{}\"", name)
            }
            ParameterIssue::BelowMinimum { name, min } => {
                format!("Parameter \"{}\" must be at least {}", name, min)
            }
        }
    }

    pub fn to_caught(&self) -> Value {
        let name = match self {
            ParameterIssue::Missing { name } | ParameterIssue::BelowMinimum { name, .. } => *name,
        };
        serde_json::json!({
            "name": "ParameterError",
            "message": self.message(),
            "parameter": name,
        })
    }
}

/// Fills declared defaults for visible, absent fields and checks required
/// and minimum constraints. Fields hidden by their discriminator are left
/// untouched.
pub fn resolve_parameters(
    op: Operation,
    raw: &RawParameters,
) -> Result<RawParameters, ParameterIssue> {
    let mut resolved = raw.clone();
    apply(fields(op), "", &mut resolved)?;
    if op == Operation::InviteToFollowPage {
        let filters = INVITE_TO_FOLLOW_PAGE
            .iter()
            .find(|f| f.name == "filters")
            .map(|f| f.is_visible(&resolved))
            .unwrap_or(false);
        if filters {
            apply(FOLLOW_PAGE_FILTERS, "filters.", &mut resolved)?;
        }
    }
    if op.accepts_execution_options() {
        apply(EXECUTION_OPTIONS, "execution.", &mut resolved)?;
    }
    Ok(resolved)
}

fn apply(
    specs: &'static [FieldSpec],
    prefix: &str,
    params: &mut RawParameters,
) -> Result<(), ParameterIssue> {
    for spec in specs {
        if !spec.is_visible(params) {
            continue;
        }
        let path = format!("{}{}", prefix, spec.name);
        if !spec.is_filled(params.get(&path)) {
            match spec.default.to_value() {
                Some(value) => params.set(&path, value),
                None if spec.required => {
                    return Err(ParameterIssue::Missing { name: spec.name });
                }
                None => continue,
            }
        }
        if let (Some(min), Some(current)) =
            (spec.min_value, params.get(&path).and_then(Value::as_f64))
        {
            if current < min as f64 {
                return Err(ParameterIssue::BelowMinimum {
                    name: spec.name,
                    min,
                });
            }
        }
    }
    Ok(())
}
