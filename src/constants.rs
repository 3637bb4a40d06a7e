pub mod api {
    pub const BASE_URL: &str = "https://app.browserflow.io/api/";
    pub const ACCEPT: &str = "application/json";
    pub const CONTENT_TYPE: &str = "application/json";
    pub const JOB_RESULT_PATH: &str = "linkedin-job-result";
}

pub mod node {
    pub const NAME: &str = "browserflow";
    pub const DISPLAY_NAME: &str = "Browserflow for LinkedIn";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const RESOURCE_LINKEDIN: &str = "linkedin";
    pub const DEFAULT_OPERATION: &str = "checkConnection";
}

pub mod errors {
    pub const UNKNOWN_STATUS: &str = "unknown";
    pub const UNKNOWN_MESSAGE: &str = "Unknown error";
    pub const SPLIT_FAILURE_MESSAGE: &str = "Request failed";

    // Wording is part of the output contract hosts match against.
    pub fn banner(status: &str) -> String {
        format!("An error with status {} occured", status)
    }
}

pub mod env {
    pub const API_KEY: &str = "BROWSERFLOW_API_KEY";
    pub const BASE_URL: &str = "BROWSERFLOW_BASE_URL";
    pub const OUTPUT_MODE: &str = "BROWSERFLOW_OUTPUT_MODE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod limits {
    pub const SUGGESTION_LIMIT: usize = 5;
    pub const LOG_BODY_PREVIEW: usize = 240;
}
