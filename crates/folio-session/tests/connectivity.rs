//! Connection monitor tests.

mod support;

use std::sync::Arc;
use std::time::Duration;

use folio_client::{ApiClient, Method};
use folio_core::enums::Connectivity;
use folio_session::{ConnectionMonitor, SessionController};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Notify;
use tokio::time::Instant;

use support::{ScriptedTransport, Step};

fn monitor(transport: &Arc<ScriptedTransport>) -> ConnectionMonitor {
    ConnectionMonitor::new(ApiClient::new(transport.clone()), Duration::from_secs(5))
}

#[tokio::test]
async fn starts_unknown() {
    let transport = ScriptedTransport::new();
    let monitor = monitor(&transport);
    assert_eq!(monitor.connectivity(), Connectivity::Unknown);
    assert!(!monitor.is_checking());

    let controller = support::controller(&transport);
    assert_eq!(controller.state().connectivity, Connectivity::Unknown);
}

#[tokio::test]
async fn healthy_backend_is_reachable() {
    let transport = ScriptedTransport::new();
    transport.script("/health", Step::json(200, json!({"status": "healthy"})));
    let monitor = monitor(&transport);

    assert_eq!(monitor.probe().await, Connectivity::Reachable);
    assert_eq!(monitor.connectivity(), Connectivity::Reachable);
    assert!(!monitor.is_checking());

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "/health");
    assert_eq!(request.timeout, Duration::from_secs(5));
}

#[tokio::test]
async fn any_success_status_counts() {
    let transport = ScriptedTransport::new();
    transport.script("/health", Step::raw(204, ""));
    assert_eq!(monitor(&transport).probe().await, Connectivity::Reachable);
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let transport = ScriptedTransport::new();
    let controller = support::controller(&transport);

    assert_eq!(controller.probe().await, Connectivity::Unreachable);
    assert_eq!(controller.state().connectivity, Connectivity::Unreachable);
    assert_eq!(
        controller.subscribe().borrow().connectivity,
        Connectivity::Unreachable
    );
}

#[tokio::test]
async fn error_status_is_unreachable() {
    let transport = ScriptedTransport::new();
    transport.script("/health", Step::raw(503, "Service Unavailable"));
    assert_eq!(monitor(&transport).probe().await, Connectivity::Unreachable);
}

#[tokio::test(start_paused = true)]
async fn slow_probe_gives_up_at_the_deadline() {
    let transport = ScriptedTransport::new();
    transport.script(
        "/health",
        Step::json(200, json!({"status": "healthy"})).after(Duration::from_secs(60)),
    );
    let monitor = monitor(&transport);

    let started = Instant::now();
    let connectivity = monitor.probe().await;

    assert_eq!(connectivity, Connectivity::Unreachable);
    assert!(started.elapsed() <= Duration::from_secs(6));
}

#[tokio::test]
async fn checking_flag_is_set_while_probing() {
    let transport = ScriptedTransport::new();
    let gate = Arc::new(Notify::new());
    transport.script("/health", Step::raw(200, "{}").gated(gate.clone()));
    let monitor = monitor(&transport);
    let mut rx = monitor.subscribe();

    let (connectivity, ()) = tokio::join!(monitor.probe(), async {
        rx.wait_for(|s| s.checking).await.unwrap();
        gate.notify_one();
    });

    assert_eq!(connectivity, Connectivity::Reachable);
    assert!(!monitor.status().checking);
}

#[tokio::test]
async fn connectivity_failure_triggers_a_reprobe() {
    let transport = ScriptedTransport::new();
    let mut config = support::config();
    config.session.reprobe_on_failure = true;
    transport
        .script("/pdf-info", support::small_pdf_info())
        .script("/extract-text", support::extracted("d1", "a.pdf"))
        .script("/health", Step::raw(200, "{}"));
    let controller = SessionController::new(transport.clone(), &config);
    controller
        .start_upload(&support::pdf_bytes(1024), "a.pdf")
        .await
        .unwrap();

    // No script for /chat: the transport refuses the connection.
    let outcome = controller.submit_question("hello?").await.unwrap();
    assert!(matches!(
        outcome,
        folio_session::AskOutcome::Failed(ref err) if err.is_connectivity()
    ));

    let mut rx = controller.subscribe();
    rx.wait_for(|s| s.connectivity == Connectivity::Reachable)
        .await
        .unwrap();
    assert!(transport.paths().contains(&"/health".to_string()));
}

#[tokio::test]
async fn server_errors_do_not_reprobe() {
    let transport = ScriptedTransport::new();
    let mut config = support::config();
    config.session.reprobe_on_failure = true;
    transport
        .script("/pdf-info", support::small_pdf_info())
        .script("/extract-text", Step::json(500, json!({"error": "boom"})));
    let controller = SessionController::new(transport.clone(), &config);

    controller
        .start_upload(&support::pdf_bytes(1024), "a.pdf")
        .await
        .unwrap();
    tokio::task::yield_now().await;

    assert!(!transport.paths().contains(&"/health".to_string()));
}

#[tokio::test(start_paused = true)]
async fn probe_runs_alongside_an_upload() {
    let transport = ScriptedTransport::new();
    transport
        .script(
            "/health",
            Step::raw(200, "{}").after(Duration::from_secs(60)),
        )
        .script("/pdf-info", support::small_pdf_info())
        .script("/extract-text", support::extracted("d1", "a.pdf"));
    let controller = support::controller(&transport);

    let bytes = support::pdf_bytes(1024);

    let started = Instant::now();
    let (connectivity, upload) = tokio::join!(
        controller.probe(),
        controller.start_upload(&bytes, "a.pdf")
    );

    assert_eq!(connectivity, Connectivity::Unreachable);
    assert!(matches!(upload.unwrap(), folio_session::UploadOutcome::Bound(_)));
    assert!(started.elapsed() <= Duration::from_secs(6));
    assert_eq!(controller.state().phase, folio_core::enums::Phase::Ready);
}
