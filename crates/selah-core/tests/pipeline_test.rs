//! End-to-end tests: the full voice round trip against a mocked vendor API.

use selah_core::advice::PROVIDER_ERROR_MESSAGE;
use selah_core::{
    AdviceGenerator, AudioClip, AudioPipeline, CachedTranslator, EdenClient, LanguageCode,
    ManualClock, PollSettings, TranslationCache, VoiceAnswer, VoicePipeline, VoiceReply,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_PATH: &str = "/v2/audio/speech_to_text_async/job-42/";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pipeline(server: &MockServer) -> VoicePipeline {
    let client = Arc::new(
        EdenClient::new(
            format!("{}/v2", server.uri()),
            "test-key",
            Duration::from_secs(5),
        )
        .expect("client"),
    );
    let cache = TranslationCache::new(64, Duration::from_secs(3600), Arc::new(ManualClock::new()));
    let translator = Arc::new(CachedTranslator::new(client.clone(), Arc::new(cache)));
    let poll = PollSettings {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        max_unparsable: Some(5),
    };
    let audio = AudioPipeline::new(
        client.clone(),
        client.clone(),
        client.clone(),
        client.clone(),
        poll,
    );
    VoicePipeline::new(audio, AdviceGenerator::new(client, translator))
}

fn clip() -> AudioClip {
    AudioClip::new(b"RIFF....WAVEfmt ".to_vec(), LanguageCode::Am)
}

async fn mount_submission(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/audio/speech_to_text_async"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"public_id": "job-42"})))
        .mount(server)
        .await;
}

async fn mount_transcript(server: &MockServer, text: &str) {
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "finished",
            "results": {"google": {"text": text}}
        })))
        .mount(server)
        .await;
}

async fn mount_translation(server: &MockServer, target: &str, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v2/translation/automatic_translation"))
        .and(body_partial_json(json!({"target_language": target})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

async fn mount_generation(server: &MockServer, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v2/text/generation"))
        .and(body_partial_json(json!({"providers": "openai", "max_tokens": 800})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

async fn mount_speech(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v2/audio/text_to_speech"))
        .and(body_partial_json(json!({"providers": "microsoft", "option": "FEMALE"})))
        .respond_with(template)
        .mount(server)
        .await;
}

fn success_text(provider: &str, text: &str) -> serde_json::Value {
    json!({ provider: {"status": "success", "text": text} })
}

async fn happy_path(server: &MockServer) {
    mount_submission(server).await;
    mount_transcript(server, "hello").await;
    mount_translation(server, "en", success_text("google", "hello")).await;
    mount_generation(
        server,
        json!({"openai": {"status": "success", "generated_text": "Be still."}}),
    )
    .await;
    mount_translation(server, "am", success_text("google", "ጸጥ በል።")).await;
    mount_speech(
        server,
        ResponseTemplate::new(200).set_body_json(json!({
            "microsoft": {"status": "success", "audio_resource_url": "https://audio/1"}
        })),
    )
    .await;
}

#[tokio::test]
async fn voice_round_trip_returns_answer_url_and_text() {
    init_tracing();
    let server = MockServer::start().await;
    happy_path(&server).await;

    let reply = pipeline(&server).handle(&clip()).await;

    assert_eq!(
        reply,
        VoiceReply::Answer(VoiceAnswer {
            answer_url: "https://audio/1".to_string(),
            text: "ጸጥ በል።".to_string(),
        })
    );
    assert_eq!(
        serde_json::to_value(&reply).unwrap(),
        json!({"answerUrl": "https://audio/1", "text": "ጸጥ በል።"})
    );
}

#[tokio::test]
async fn repeated_advice_is_translated_once() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "finished",
            "results": {"google": {"text": "hello"}}
        })))
        .mount(&server)
        .await;
    mount_translation(&server, "en", success_text("google", "hello")).await;
    mount_generation(
        &server,
        json!({"openai": {"status": "success", "generated_text": "Be still."}}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/translation/automatic_translation"))
        .and(body_partial_json(json!({
            "target_language": "am",
            "source_language": "en",
            "fallback_providers": "amazon"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_text("google", "ጸጥ በል።")))
        .expect(1)
        .mount(&server)
        .await;
    mount_speech(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "microsoft": {"audio_resource_url": "https://audio/1"}
        })),
    )
    .await;

    let p = pipeline(&server);
    for _ in 0..2 {
        let answer = p.respond(&clip()).await.unwrap();
        assert_eq!(answer.text, "ጸጥ በል።");
    }
    assert_eq!(p.advisor().translator().cache_len(), 1);
}

#[tokio::test]
async fn fallback_provider_is_used_when_primary_fails() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_transcript(&server, "hello").await;
    mount_translation(&server, "en", success_text("google", "hello")).await;
    mount_generation(
        &server,
        json!({"openai": {"status": "success", "generated_text": "Be still."}}),
    )
    .await;
    mount_translation(
        &server,
        "am",
        json!({
            "google": {"status": "fail", "error": "quota"},
            "amazon": {"status": "success", "text": "ዝም በል።"}
        }),
    )
    .await;
    mount_speech(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "microsoft": {"audio_resource_url": "https://audio/2"}
        })),
    )
    .await;

    let answer = pipeline(&server).respond(&clip()).await.unwrap();
    assert_eq!(answer.text, "ዝም በል።");
    assert_eq!(answer.answer_url, "https://audio/2");
}

#[tokio::test]
async fn degraded_generation_is_spoken_untranslated() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_transcript(&server, "hello").await;
    mount_translation(&server, "en", success_text("google", "hello")).await;
    mount_generation(
        &server,
        json!({"openai": {"status": "fail", "error": "rate limited"}}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/translation/automatic_translation"))
        .and(body_partial_json(json!({"target_language": "am"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_text("google", "x")))
        .expect(0)
        .mount(&server)
        .await;
    mount_speech(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "microsoft": {"audio_resource_url": "https://audio/3"}
        })),
    )
    .await;

    let answer = pipeline(&server).respond(&clip()).await.unwrap();
    assert_eq!(answer.text, PROVIDER_ERROR_MESSAGE);
}

#[tokio::test]
async fn missing_job_id_becomes_error_reply() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/audio/speech_to_text_async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "bad file"})))
        .mount(&server)
        .await;

    match pipeline(&server).handle(&clip()).await {
        VoiceReply::Error { error } => assert!(error.starts_with("Submission error")),
        other => panic!("expected error reply, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_job_becomes_error_reply() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "failed", "error": "corrupt"})),
        )
        .mount(&server)
        .await;

    match pipeline(&server).handle(&clip()).await {
        VoiceReply::Error { error } => {
            assert!(error.starts_with("Transcription job failed"));
            assert!(error.contains("corrupt"));
        }
        other => panic!("expected error reply, got {:?}", other),
    }
}

#[tokio::test]
async fn unparsable_status_is_retried() {
    init_tracing();
    let server = MockServer::start().await;
    happy_path(&server).await;
    // Registered after the happy path mocks but with higher priority.
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    let answer = pipeline(&server).respond(&clip()).await.unwrap();
    assert_eq!(answer.answer_url, "https://audio/1");
}

#[tokio::test]
async fn speech_failure_becomes_error_reply() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_transcript(&server, "hello").await;
    mount_translation(&server, "en", success_text("google", "hello")).await;
    mount_generation(
        &server,
        json!({"openai": {"status": "success", "generated_text": "Be still."}}),
    )
    .await;
    mount_translation(&server, "am", success_text("google", "ጸጥ በል።")).await;
    mount_speech(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

    match pipeline(&server).handle(&clip()).await {
        VoiceReply::Error { error } => assert!(error.starts_with("Vendor unavailable")),
        other => panic!("expected error reply, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_english_translation_falls_back_to_transcript() {
    init_tracing();
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_transcript(&server, "selam").await;
    Mock::given(method("POST"))
        .and(path("/v2/translation/automatic_translation"))
        .and(body_partial_json(json!({"target_language": "en"})))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/text/generation"))
        .and(body_partial_json(json!({"providers": "openai"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openai": {"status": "success", "generated_text": "Peace."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_translation(&server, "am", success_text("google", "ሰላም።")).await;
    mount_speech(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "microsoft": {"audio_resource_url": "https://audio/4"}
        })),
    )
    .await;

    let answer = pipeline(&server).respond(&clip()).await.unwrap();
    assert_eq!(answer.text, "ሰላም።");

    let generation = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/v2/text/generation")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&generation.body).unwrap();
    assert!(body["text"].as_str().unwrap().contains("User's Situation:\nselam"));
}

#[tokio::test]
async fn detects_spoken_language() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/audio/speech_to_text_async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"public_id": "job-42"})))
        .mount(&server)
        .await;
    mount_transcript(&server, "selam new").await;
    Mock::given(method("POST"))
        .and(path("/v2/translation/language_detection"))
        .and(body_partial_json(json!({"providers": "google", "text": "selam new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "google": {
                "status": "success",
                "items": [{"language": "am", "display_name": "Amharic", "confidence": 0.93}]
            }
        })))
        .mount(&server)
        .await;

    let language = pipeline(&server).audio().detect_language(&clip()).await.unwrap();
    assert_eq!(language, "Amharic");
}
