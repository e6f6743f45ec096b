use osmos::http::{ProbeClient, ProbePolicy};
use osmos::reporting::Finding;
use osmos::xss::{FilteredPolicy, Pipeline, PipelineConfig};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

fn pipeline(config: PipelineConfig) -> Pipeline {
    Pipeline::new(ProbeClient::new(ProbePolicy::default()).unwrap(), config)
}

/// Echo `x`, keeping only alphanumerics and quotes
fn quote_echo(req: &Request) -> ResponseTemplate {
    let x: String = req
        .url
        .query_pairs()
        .find(|(k, _)| k == "x")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '\'' || *c == '"')
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>You searched for {}</body></html>", x),
        "text/html",
    )
}

/// Echo `x` verbatim, stalling for 3s whenever `stall(x)` holds
fn stalling_echo(
    stall: impl Fn(&str) -> bool + Send + Sync + 'static,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    move |req: &Request| {
        let x = req
            .url
            .query_pairs()
            .find(|(k, _)| k == "x")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        let template = ResponseTemplate::new(200)
            .set_body_raw(format!("<html><body>{}</body></html>", x), "text/html");
        if stall(&x) {
            template.set_delay(Duration::from_secs(3))
        } else {
            template
        }
    }
}

fn short_deadline_pipeline() -> Pipeline {
    let policy = ProbePolicy {
        request_timeout: Duration::from_millis(500),
        ..ProbePolicy::default()
    };
    Pipeline::new(ProbeClient::new(policy).unwrap(), PipelineConfig::default())
}

fn unfiltered(findings: &[Finding]) -> Vec<(String, String, Vec<String>)> {
    findings
        .iter()
        .filter_map(|f| match f {
            Finding::UnfilteredChars { url, param, chars } => {
                Some((url.clone(), param.clone(), chars.clone()))
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_end_to_end_quotes_survive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(quote_echo)
        .mount(&server)
        .await;

    let target = format!("{}/page?x=hello", server.uri());
    let findings = pipeline(PipelineConfig::default()).run(&target).await;

    assert!(findings.contains(&Finding::ReflectedParameter {
        url: target.clone(),
        param: "x".into(),
    }));

    let groups = unfiltered(&findings);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0, target);
    assert_eq!(groups[0].1, "x");
    assert_eq!(groups[0].2, vec!["\"".to_string(), "'".to_string()]);

    assert!(!findings.iter().any(|f| f.is_error()));
}

#[tokio::test]
async fn test_no_query_reports_no_reflection_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(quote_echo)
        .expect(1)
        .mount(&server)
        .await;

    let target = format!("{}/page", server.uri());
    let findings = pipeline(PipelineConfig::default()).run(&target).await;

    assert_eq!(findings, vec![Finding::NoReflection { url: target }]);
}

#[tokio::test]
async fn test_unconfirmed_reflection_is_dropped() {
    let server = MockServer::start().await;
    // "hello" is static page text, the parameter itself is never echoed
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>hello there</h1>", "text/html"))
        .mount(&server)
        .await;

    let target = format!("{}/?x=hello", server.uri());
    let findings = pipeline(PipelineConfig::default()).run(&target).await;

    assert_eq!(
        findings,
        vec![Finding::ReflectedParameter {
            url: target,
            param: "x".into(),
        }]
    );
}

#[tokio::test]
async fn test_unconfirmed_reflection_reported_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>hello there</h1>", "text/html"))
        .mount(&server)
        .await;

    let target = format!("{}/?x=hello", server.uri());
    let config = PipelineConfig {
        filtered_policy: FilteredPolicy::Report,
        ..PipelineConfig::default()
    };
    let findings = pipeline(config).run(&target).await;

    assert!(findings.contains(&Finding::ReflectedButFiltered {
        url: target,
        param: "x".into(),
    }));
    assert!(unfiltered(&findings).is_empty());
}

#[tokio::test]
async fn test_valueless_param_goes_through_marker_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(quote_echo)
        .mount(&server)
        .await;

    // `debug` has no value and is trivially "reflected"; `x` is echoed
    let target = format!("{}/page?debug&x=abc", server.uri());
    let findings = pipeline(PipelineConfig::default()).run(&target).await;

    let reflected: Vec<&str> = findings
        .iter()
        .filter(|f| matches!(f, Finding::ReflectedParameter { .. }))
        .filter_map(|f| f.param())
        .collect();
    assert!(reflected.contains(&"debug"));
    assert!(reflected.contains(&"x"));

    let groups = unfiltered(&findings);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1, "x");
}

#[tokio::test]
async fn test_independent_targets_get_independent_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(quote_echo)
        .mount(&server)
        .await;

    let targets: Vec<String> = (0..5)
        .map(|i| format!("{}/p{}?x=v{}", server.uri(), i, i))
        .collect();

    let config = PipelineConfig {
        concurrency: 4,
        ..PipelineConfig::default()
    };
    let findings = pipeline(config).spawn(targets.clone()).collect().await;

    let groups = unfiltered(&findings);
    assert_eq!(groups.len(), targets.len());
    for target in &targets {
        let group: Vec<_> = groups.iter().filter(|g| &g.0 == target).collect();
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].2, vec!["\"".to_string(), "'".to_string()]);
    }
}

#[tokio::test]
async fn test_failing_target_does_not_stop_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(quote_echo)
        .mount(&server)
        .await;

    let good = format!("{}/ok?x=fine", server.uri());
    let bad = "http://127.0.0.1:1/?x=1".to_string();

    let findings = pipeline(PipelineConfig::default())
        .spawn(vec![bad.clone(), good.clone()])
        .collect()
        .await;

    assert!(findings
        .iter()
        .any(|f| matches!(f, Finding::ProbeFailed { url, .. } if url == &bad)));
    assert_eq!(unfiltered(&findings).len(), 1);
    assert_eq!(unfiltered(&findings)[0].0, good);
}

#[tokio::test]
async fn test_single_worker_pipeline_completes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(quote_echo)
        .mount(&server)
        .await;

    let config = PipelineConfig {
        concurrency: 1,
        channel_capacity: 1,
        ..PipelineConfig::default()
    };
    let targets: Vec<String> = (0..3)
        .map(|i| format!("{}/s{}?x=a{}&y=b", server.uri(), i, i))
        .collect();
    let findings = pipeline(config).spawn(targets).collect().await;
    assert_eq!(unfiltered(&findings).len(), 3);
}

#[tokio::test]
async fn test_cancellation_drains_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let p = pipeline(PipelineConfig::default());
    let targets: Vec<String> = (0..3).map(|i| format!("{}/c{}?x=late", server.uri(), i)).collect();
    let findings = p.spawn(targets);

    tokio::time::sleep(Duration::from_millis(200)).await;
    p.cancel();

    let collected = tokio::time::timeout(Duration::from_secs(5), findings.collect())
        .await
        .expect("pipeline did not close after cancellation");
    assert!(unfiltered(&collected).is_empty());
    assert!(!collected.iter().any(|f| f.is_error()));
}

#[tokio::test]
async fn test_timed_out_char_is_skipped_and_rest_reported_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(stalling_echo(|x| x.contains('$')))
        .mount(&server)
        .await;

    let target = format!("{}/search?x=hello", server.uri());
    let findings = short_deadline_pipeline().run(&target).await;

    let groups = unfiltered(&findings);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].1, "x");
    let expected: Vec<String> = ["\"", "'", "<", ">", "|", "(", ")", "`", ":", ";", "{", "}"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(groups[0].2, expected);

    // a failed character is dropped silently, not reported as a failure
    assert!(!findings.iter().any(|f| f.is_error()));
}

#[tokio::test]
async fn test_marker_check_failure_is_reported_for_param() {
    let server = MockServer::start().await;
    let marker = PipelineConfig::default().marker;
    Mock::given(method("GET"))
        .respond_with(stalling_echo(move |x| x == marker))
        .mount(&server)
        .await;

    let target = format!("{}/search?x=hello", server.uri());
    let findings = short_deadline_pipeline().run(&target).await;

    assert!(findings.contains(&Finding::ReflectedParameter {
        url: target.clone(),
        param: "x".into(),
    }));
    assert!(findings.iter().any(|f| matches!(
        f,
        Finding::ProbeFailed { url, param: Some(p), .. } if url == &target && p == "x"
    )));
    assert!(unfiltered(&findings).is_empty());
}
