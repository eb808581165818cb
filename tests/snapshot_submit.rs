use axum::extract::{Multipart, State};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use proctor_cam::capture::{CaptureConfig, MockCamera, SnapshotConfig};
use proctor_cam::snapshot::{HttpFormTarget, SnapshotForm, SnapshotSubmitter};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text { name: String, value: String },
    File { name: String, file_name: String, content_type: String, bytes: Vec<u8> },
}

type Submissions = Arc<Mutex<Vec<Vec<Part>>>>;

async fn save_capture(State(submissions): State<Submissions>, mut multipart: Multipart) -> Redirect {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap().to_vec();
                parts.push(Part::File { name, file_name, content_type, bytes });
            }
            None => {
                let value = field.text().await.unwrap();
                parts.push(Part::Text { name, value });
            }
        }
    }
    submissions.lock().unwrap().push(parts);
    Redirect::to("/exam")
}

async fn exam() -> &'static str {
    "exam page"
}

async fn spawn_form_server(submissions: Submissions) -> SocketAddr {
    let router = Router::new()
        .route("/save_capture", post(save_capture))
        .route("/exam", get(exam))
        .with_state(submissions);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind form server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

fn submitter(addr: SocketAddr) -> SnapshotSubmitter {
    let settings = SnapshotConfig::default();
    let action = Url::parse(&format!("http://{}/save_capture", addr)).unwrap();
    let form = SnapshotForm::new(action, settings.file_field.clone()).with_field("student_id", "42");
    SnapshotSubmitter::setup(
        Box::new(MockCamera::new()),
        &CaptureConfig::default(),
        &settings,
        form,
        Arc::new(HttpFormTarget::new()),
    )
}

#[tokio::test]
async fn trigger_posts_one_jpeg_and_follows_redirect() {
    let submissions = Submissions::default();
    let addr = spawn_form_server(submissions.clone()).await;
    let mut submitter = submitter(addr);

    let response = submitter.trigger().await.expect("submission succeeds");

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.final_url.path(), "/exam");

    let submissions = submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);

    let parts = &submissions[0];
    assert!(parts.contains(&Part::Text {
        name: "student_id".to_string(),
        value: "42".to_string(),
    }));

    let files: Vec<_> = parts
        .iter()
        .filter_map(|p| match p {
            Part::File { name, file_name, content_type, bytes } => {
                Some((name, file_name, content_type, bytes))
            }
            Part::Text { .. } => None,
        })
        .collect();
    assert_eq!(files.len(), 1);
    let (name, file_name, content_type, bytes) = files[0];
    assert_eq!(name, "webcam");
    assert_eq!(file_name, "webcam.jpg");
    assert_eq!(content_type, "image/jpeg");

    let decoded = image::load_from_memory(bytes).expect("valid jpeg");
    assert_eq!((decoded.width(), decoded.height()), (640, 480));
}

#[tokio::test]
async fn every_trigger_submits_exactly_once() {
    let submissions = Submissions::default();
    let addr = spawn_form_server(submissions.clone()).await;
    let mut submitter = submitter(addr);

    for expected in 1..=3 {
        submitter.trigger().await.expect("submission succeeds");
        assert_eq!(submissions.lock().unwrap().len(), expected);
    }
}
