//! Verify client operations against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation and its arguments, the responses a server
//! would give in order, the requests the client must send, and the expected
//! result or error kind. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field ordering.

use std::cell::RefCell;
use std::collections::VecDeque;

use mermaid_core::{
    ApiClient, ApiError, ClientConfig, FilterValue, HttpRequest, HttpResponse, ProjectRef, Transport,
};
use serde_json::Value;

/// Replays canned responses in order and records what was sent.
struct ReplayTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ReplayTransport {
    fn new(simulated: &Value) -> Self {
        let responses = simulated
            .as_array()
            .unwrap()
            .iter()
            .map(|r| HttpResponse::new(r["status"].as_u64().unwrap() as u16, r["body"].as_str().unwrap()))
            .collect();
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for ReplayTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::ConnectionError(format!("unexpected request {}", request.full_url())))
    }
}

fn filter_val(args: &Value) -> Option<FilterValue> {
    match &args["filter_val"] {
        Value::Number(n) => Some(FilterValue::from(n.as_i64().unwrap())),
        Value::String(s) => Some(FilterValue::from(s.as_str())),
        _ => None,
    }
}

fn run<T: Transport>(client: &ApiClient<T>, operation: &str, args: &Value) -> Result<Value, ApiError> {
    let kind = args["kind"].as_str().unwrap_or_default();
    let filter = args["filter"].as_str();
    let project = || {
        ProjectRef::from_parts(
            args["project"]["id"].as_str(),
            args["project"]["name"].as_str(),
            None,
        )
    };

    match operation {
        "get_info" => client.get_info(kind),
        "get_choices" => client.get_choices(),
        "get_attribute" => client.get_attribute(kind),
        "get_projects" => client.get_projects(args["showall"].as_bool().unwrap_or(false)),
        "resolve_project" => client
            .resolve_project(&project()?)
            .map(|p| serde_json::to_value(p).unwrap()),
        "resolve_project_id" => client.resolve_project_id(&project()?).map(Value::from),
        "get_project_resource" => client.get_project_resource(kind, &project()?),
        "get_observations" => client.get_observations(kind, &project()?, filter, filter_val(args)),
        "get_sample_units" => client.get_sample_units(kind, &project()?, filter, filter_val(args)),
        "get_sample_methods" => client.get_sample_methods(kind, &project()?),
        "get_sample_events" => client.get_sample_events(&project()?, filter, filter_val(args)),
        other => panic!("unknown operation: {other}"),
    }
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::Unauthorized(_) => "Unauthorized",
        ApiError::InvalidResource(_) => "InvalidResource",
        ApiError::InvalidProject(_) => "InvalidProject",
        ApiError::TransportError { .. } => "TransportError",
        ApiError::ConnectionError(_) => "ConnectionError",
        ApiError::DeserializationError(_) => "DeserializationError",
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let args = &case["args"];

        let mut config = ClientConfig::default().with_base_url(base_url);
        if let Some(token) = args["token"].as_str() {
            config = config.with_token(token);
        }
        let transport = ReplayTransport::new(&case["simulated_responses"]);
        let client = ApiClient::new(config, &transport);

        let result = run(&client, case["operation"].as_str().unwrap(), args);

        // Verify requests
        let sent: Vec<String> = transport.requests.borrow().iter().map(HttpRequest::full_url).collect();
        let expected: Vec<String> = case["expected_requests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| format!("{base_url}/{}", p.as_str().unwrap()))
            .collect();
        assert_eq!(sent, expected, "{name}: requests");

        if let Some(auth) = case.get("expected_authorization") {
            for req in transport.requests.borrow().iter() {
                assert_eq!(req.header("authorization"), auth.as_str(), "{name}: authorization");
            }
        }

        // Verify outcome
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_kind(&err), expected_error.as_str().unwrap(), "{name}: error kind");
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(value, case["expected_result"], "{name}: result");
        }
    }
}
