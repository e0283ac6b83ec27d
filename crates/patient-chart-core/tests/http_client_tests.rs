//! HTTP client tests against a one-shot loopback server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use patient_chart_core::api::{ApiError, ClientConfig, CreateAck, HttpPatientApi, PatientApi};
use patient_chart_core::app::AppShell;
use patient_chart_core::models::{NewPatient, NewRecord};

/// A request as seen by the stub server.
struct Captured {
    request_line: String,
    body: String,
}

/// Serve exactly one request with the given status line and JSON body.
fn serve_once(status: &'static str, body: &'static str) -> (ClientConfig, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let captured = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        captured
    });

    (ClientConfig::new(format!("http://{}", addr)), handle)
}

fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Captured {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[body_start..]).to_string(),
    }
}

#[test]
fn test_fetch_patients_keeps_document_order() {
    let (config, server) = serve_once(
        "200 OK",
        r#"{"b2":{"patient_id":"b2","name":"Bea","age":52,"gender":"F","records":[]},
            "a1":{"patient_id":"a1","name":"Abe","age":7,"gender":"M","records":[
                {"date":"2024-03-05 09:12:44.120931","symptoms":"rash","bp":null,"temp":"99.5"}]}}"#,
    );
    let api = HttpPatientApi::new(&config).unwrap();

    let patients = api.fetch_patients().unwrap();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "GET /patients HTTP/1.1");
    let names: Vec<_> = patients.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bea", "Abe"]);
    assert_eq!(patients[1].records[0].temperature(), Some("99.5"));
}

#[test]
fn test_create_patient_posts_four_fields() {
    let (config, server) = serve_once("200 OK", r#"{"message": "Patient added successfully"}"#);
    let api = HttpPatientApi::new(&config).unwrap();

    let request = NewPatient {
        patient_id: "0b0c5a84-3c4e-4bde-9c52-3f7ad8d0a111".into(),
        name: "Bob".into(),
        age: 45,
        gender: "M".into(),
    };
    let ack = api.create_patient(&request).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "POST /patients HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "patient_id": "0b0c5a84-3c4e-4bde-9c52-3f7ad8d0a111",
            "name": "Bob",
            "age": 45,
            "gender": "M"
        })
    );
    assert_eq!(
        ack,
        CreateAck::Acknowledged {
            message: Some("Patient added successfully".into())
        }
    );
}

#[test]
fn test_duplicate_patient_surfaces_service_error() {
    let (config, server) = serve_once("400 BAD REQUEST", r#"{"error": "Patient already exists"}"#);
    let api = HttpPatientApi::new(&config).unwrap();

    let request = NewPatient {
        patient_id: "dup".into(),
        name: "Bob".into(),
        age: 45,
        gender: "M".into(),
    };
    let err = api.create_patient(&request).unwrap_err();
    server.join().unwrap();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Patient already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_fetch_unknown_patient() {
    let (config, server) = serve_once("404 NOT FOUND", r#"{"error": "Patient not found"}"#);
    let api = HttpPatientApi::new(&config).unwrap();

    let err = api.fetch_patient("nobody").unwrap_err();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "GET /patients/nobody HTTP/1.1");
    assert_eq!(err.status(), Some(404));
}

#[test]
fn test_add_record_posts_to_patient() {
    let (config, server) = serve_once("200 OK", r#"{"message": "Record added successfully"}"#);
    let api = HttpPatientApi::new(&config).unwrap();

    let mut record = NewRecord::new("cough");
    record.bp = Some("118/76".into());
    api.add_record("p1", &record).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "POST /patients/p1/records HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body, serde_json::json!({ "symptoms": "cough", "bp": "118/76" }));
}

#[test]
fn test_malformed_listing_is_a_decode_error() {
    let (config, server) = serve_once("200 OK", r#"[1, 2, 3]"#);
    let api = HttpPatientApi::new(&config).unwrap();

    let err = api.fetch_patients().unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn test_unreachable_service() {
    // Reserve a port, then free it so nothing is listening.
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let api = HttpPatientApi::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();

    let err = api.fetch_patients().unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}

#[test]
fn test_shell_mounts_over_http() {
    let (config, server) = serve_once(
        "200 OK",
        r#"{"id1":{"patient_id":"id1","name":"Alice","age":30,"gender":"F","records":[]}}"#,
    );
    let api = HttpPatientApi::new(&config).unwrap();
    let mut shell = AppShell::new();

    shell.mount(&api);
    server.join().unwrap();

    let out = shell.render();
    assert!(out.contains("Alice"));
    assert!(out.contains("Age: 30"));
}

#[test]
fn test_shell_survives_server_error() {
    let (config, server) = serve_once("500 INTERNAL SERVER ERROR", r#"{"error": "boom"}"#);
    let api = HttpPatientApi::new(&config).unwrap();
    let mut shell = AppShell::new();

    shell.mount(&api);
    server.join().unwrap();

    assert!(!shell.is_loading());
    assert!(shell.patients().is_empty());
}
