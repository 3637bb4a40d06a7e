mod common;
use common::{dispatcher, dispatcher_with, http_failure, ScriptedTransport};

use browserflow::errors::NodeErrorKind;
use browserflow::node::{HttpMethod, InputItem, OutputChannels, OutputMode};
use serde_json::{json, Value};

fn profile_item(url: &str) -> InputItem {
    InputItem::new(json!({ "operation": "getProfileData", "linkedinUrl": url }))
        .with_json(json!({ "row": url }))
}

fn three_items() -> Vec<InputItem> {
    vec![profile_item("a"), profile_item("b"), profile_item("c")]
}

fn failing_second() -> ScriptedTransport {
    ScriptedTransport::new(vec![
        Ok(json!({ "name": "Ada" })),
        Err(http_failure(404, "Not Found", json!({ "error": "Not found" }))),
        Ok(json!({ "name": "Cy" })),
    ])
}

#[tokio::test]
async fn hard_fail_stops_at_first_failed_item() {
    let transport = failing_second();
    let err = dispatcher(&transport)
        .run(&three_items(), false)
        .await
        .expect_err("batch must fail");

    assert_eq!(err.kind, NodeErrorKind::RemoteRequest);
    assert_eq!(err.message, "An error with status 404 occured");
    assert_eq!(err.description.as_deref(), Some("Not found"));
    let details = err.details.expect("details");
    assert_eq!(details["itemIndex"], json!(1));
    assert_eq!(details["status"], json!(404));

    assert_eq!(transport.requests().len(), 2, "item 3 must never be sent");
}

#[tokio::test]
async fn continue_mode_merges_error_records_in_order() {
    let transport = failing_second();
    let outputs = dispatcher(&transport)
        .run(&three_items(), true)
        .await
        .expect("batch result");

    let OutputChannels::Merged(records) = outputs else {
        panic!("expected merged output");
    };
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], json!({ "name": "Ada" }));
    assert_eq!(
        records[1],
        json!({
            "row": "b",
            "error": {
                "itemIndex": 1,
                "message": "An error with status 404 occured",
                "description": "Not found",
                "httpCode": "404",
                "body": { "error": "Not found" },
            },
        })
    );
    assert_eq!(records[2], json!({ "name": "Cy" }));
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn continue_mode_split_routes_failures_to_second_stream() {
    let transport = failing_second();
    let config = common::config().with_output_mode(OutputMode::Split);
    let outputs = dispatcher_with(config, &transport)
        .run(&three_items(), true)
        .await
        .expect("batch result");

    let streams = outputs.into_streams();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0], vec![json!({ "name": "Ada" }), json!({ "name": "Cy" })]);
    assert_eq!(
        streams[1],
        vec![json!({
            "itemIndex": 1,
            "status": 404,
            "message": "Request failed",
            "detail": "Not found",
        })]
    );
}

#[tokio::test]
async fn unsupported_resource_passes_through_without_a_call() {
    let transport = ScriptedTransport::default();
    let items = vec![InputItem::new(json!({ "resource": "twitter", "operation": "sendMessage" }))];
    let outputs = dispatcher(&transport).run(&items, false).await.expect("batch");

    assert_eq!(outputs.into_streams(), vec![vec![json!({ "success": true })]]);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn unknown_operation_aborts_even_in_continue_mode() {
    let transport = ScriptedTransport::default();
    let items = vec![
        profile_item("a"),
        InputItem::new(json!({ "operation": "sendMesage", "linkedinUrl": "b" })),
        profile_item("c"),
    ];
    let err = dispatcher(&transport)
        .run(&items, true)
        .await
        .expect_err("unknown operation must abort");

    assert_eq!(err.kind, NodeErrorKind::UnknownOperation);
    assert!(err.message.contains("sendMesage"));
    assert!(err.hint.unwrap_or_default().contains("sendMessage"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn missing_required_parameter_is_an_item_failure() {
    let transport = ScriptedTransport::default();
    let items = vec![
        InputItem::new(json!({ "operation": "sendMessage", "linkedinUrl": "a" })),
        InputItem::new(json!({ "operation": "sendMessage", "linkedinUrl": "b", "message": "hi" })),
    ];
    let outputs = dispatcher(&transport).run(&items, true).await.expect("batch");

    let streams = outputs.into_streams();
    assert_eq!(streams[0].len(), 2);
    let error = &streams[0][0]["error"];
    assert_eq!(error["message"], json!("An error with status unknown occured"));
    assert_eq!(error["description"], json!("Could not get parameter \"message\""));
    assert_eq!(error["httpCode"], Value::Null);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body.clone().map(Value::Object),
        Some(json!({ "linkedinUrl": "b", "message": "hi" }))
    );
}

#[tokio::test]
async fn execution_options_reach_the_wire() {
    let transport = ScriptedTransport::new(vec![Ok(json!({ "jobId": "1201bfb7" }))]);
    let items = vec![InputItem::new(json!({
        "operation": "scrapeProfilesFromSearch",
        "searchTerm": "rust engineer",
        "execution": {
            "use_polling": true,
            "callback_url": "https://example.com/hook",
        },
    }))];
    let outputs = dispatcher(&transport).run(&items, false).await.expect("batch");
    assert_eq!(outputs.into_streams(), vec![vec![json!({ "jobId": "1201bfb7" })]]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url.as_str(),
        "https://app.browserflow.io/api/linkedin-scrape-profiles-from-search"
    );
    let body = Value::Object(request.body.clone().expect("body"));
    assert_eq!(body["searchTerm"], json!("rust engineer"));
    assert_eq!(body["use_polling"], json!(true));
    assert_eq!(body["callback_url"], json!("https://example.com/hook"));
}

#[tokio::test]
async fn job_result_is_fetched_without_body() {
    let transport = ScriptedTransport::new(vec![Ok(json!(["row-1", "row-2"]))]);
    let items = vec![InputItem::new(json!({
        "operation": "getJobResult",
        "jobId": "job 42",
        "execution": { "use_polling": true },
    }))];
    let outputs = dispatcher(&transport).run(&items, false).await.expect("batch");
    assert_eq!(
        outputs.into_streams(),
        vec![vec![json!({ "data": ["row-1", "row-2"] })]]
    );

    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(
        requests[0].url.as_str(),
        "https://app.browserflow.io/api/linkedin-job-result/job%2042"
    );
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn empty_batch_yields_empty_stream() {
    let transport = ScriptedTransport::default();
    let outputs = dispatcher(&transport).run(&[], false).await.expect("batch");
    assert!(outputs.is_empty());
    assert_eq!(outputs.into_streams(), vec![Vec::<Value>::new()]);
}

#[tokio::test]
async fn non_string_operation_is_unknown_not_defaulted() {
    for operation in [json!(7), json!(true), json!([])] {
        let transport = ScriptedTransport::default();
        let items = vec![InputItem::new(json!({ "operation": operation, "linkedinUrl": "u" }))];
        let err = dispatcher(&transport)
            .run(&items, true)
            .await
            .expect_err("non-string operation must abort");

        assert_eq!(err.kind, NodeErrorKind::UnknownOperation, "{}", operation);
        assert!(transport.requests().is_empty(), "{}", operation);
    }
}

#[tokio::test]
async fn non_string_resource_passes_through() {
    let transport = ScriptedTransport::default();
    let items = vec![InputItem::new(json!({
        "resource": 1,
        "operation": "getProfileData",
        "linkedinUrl": "u",
    }))];
    let outputs = dispatcher(&transport).run(&items, false).await.expect("batch");

    assert_eq!(outputs.into_streams(), vec![vec![json!({ "success": true })]]);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn absent_operation_defaults_to_connection_check() {
    let transport = ScriptedTransport::default();
    let items = vec![InputItem::new(json!({ "linkedinUrl": "u" }))];
    dispatcher(&transport).run(&items, false).await.expect("batch");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.as_str(),
        "https://app.browserflow.io/api/linkedin-check-connection-status"
    );
}

#[tokio::test]
async fn blank_job_id_is_never_sent() {
    let transport = ScriptedTransport::default();
    let items = vec![InputItem::new(json!({ "operation": "getJobResult", "jobId": "  " }))];
    let err = dispatcher(&transport)
        .run(&items, false)
        .await
        .expect_err("blank job id must fail");

    assert_eq!(err.description.as_deref(), Some("Could not get parameter \"jobId\""));
    assert!(transport.requests().is_empty());
}
