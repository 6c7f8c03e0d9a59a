use serde_json::json;
use symbolic_calculator::{
    calc::{
        submit, CalculationRequest, Operation, SubmissionState, TransportChain, TransportError,
    },
    config::ApiConfig,
    i18n::{Language, Translator},
    page::CalculatorForm,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(base_url: &str, proxy_url: Option<&str>) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        proxy_url: proxy_url.map(str::to_string),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

// 아무것도 듣지 않는 포트. 연결이 거부된다.
const REFUSED: &str = "http://127.0.0.1:1";

fn integrate_square() -> CalculatorForm {
    CalculatorForm {
        expression: "x^2".into(),
        operation: Some(Operation::Integrate),
    }
}

#[tokio::test]
async fn direct_success_renders_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"operation": "integrate", "expression": "x^2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "x^3/3"})))
        .expect(1)
        .mount(&server)
        .await;

    let chain = TransportChain::from_config(&api(&server.uri(), None)).expect("chain");
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert_eq!(state, SubmissionState::Done("x^3/3".into()));
    assert_eq!(output, "x^3/3");
}

#[tokio::test]
async fn status_error_without_proxy_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let chain = TransportChain::from_config(&api(&server.uri(), None)).expect("chain");
    assert!(!chain.has_fallback());
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert!(matches!(state, SubmissionState::Failed(_)));
    assert_eq!(
        output,
        "\\text{Error: Server responded with status: 500}"
    );
}

#[tokio::test]
async fn proxy_fallback_recovers() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&primary)
        .await;
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .and(body_json(json!({"operation": "integrate", "expression": "x^2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "x^3/3"})))
        .expect(1)
        .mount(&proxy)
        .await;

    let chain =
        TransportChain::from_config(&api(&primary.uri(), Some(&proxy.uri()))).expect("chain");
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert_eq!(state, SubmissionState::Done("x^3/3".into()));
    assert_eq!(output, "x^3/3");
}

#[tokio::test]
async fn both_failing_reports_primary_error() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&proxy)
        .await;

    let chain =
        TransportChain::from_config(&api(&primary.uri(), Some(&proxy.uri()))).expect("chain");
    let tr = Translator::new(Language::Zh);
    let mut output = String::new();
    submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert_eq!(
        output,
        "\\text{错误: Server responded with status: 500}"
    );
}

#[tokio::test]
async fn incomplete_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "1"})))
        .expect(0)
        .mount(&server)
        .await;

    let chain = TransportChain::from_config(&api(&server.uri(), None)).expect("chain");
    let tr = Translator::new(Language::En);
    let form = CalculatorForm {
        expression: "   ".into(),
        operation: Some(Operation::Simplify),
    };
    let mut output = String::from("previous");
    let state = submit(&chain, &tr, &form, &mut output).await;

    assert_eq!(state, SubmissionState::Idle);
    assert_eq!(output, "previous");
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let chain = TransportChain::from_config(&api(&server.uri(), None)).expect("chain");
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert!(matches!(state, SubmissionState::Failed(_)));
    assert!(output.starts_with("\\text{Error: Invalid response:"), "{output}");
}

#[tokio::test]
async fn refused_connection_falls_back_to_proxy() {
    let proxy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "x^3/3"})))
        .expect(1)
        .mount(&proxy)
        .await;

    let chain = TransportChain::from_config(&api(REFUSED, Some(&proxy.uri()))).expect("chain");
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert_eq!(state, SubmissionState::Done("x^3/3".into()));
    assert_eq!(output, "x^3/3");
}

#[tokio::test]
async fn refused_connection_without_proxy_is_reported() {
    let chain = TransportChain::from_config(&api(REFUSED, None)).expect("chain");
    let tr = Translator::new(Language::En);
    let mut output = String::new();
    let state = submit(&chain, &tr, &integrate_square(), &mut output).await;

    assert!(matches!(state, SubmissionState::Failed(_)));
    assert!(
        output.starts_with("\\text{Error: error sending request"),
        "{output}"
    );
    assert!(output.contains("127.0.0.1:1/calculate"), "{output}");
}

#[tokio::test]
async fn refused_proxy_is_a_proxy_error() {
    let chain = TransportChain::from_config(&api(REFUSED, Some(REFUSED))).expect("chain");
    let request = CalculationRequest::new(Operation::Integrate, "x^2");
    let err = chain.execute(&request).await.expect_err("both refused");

    assert!(matches!(err.primary, TransportError::Network(_)));
    assert!(matches!(err.fallback, Some(TransportError::Proxy(_))));
    assert!(err.to_string().starts_with("error sending request"), "{err}");
}
