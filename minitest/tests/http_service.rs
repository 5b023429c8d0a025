//! HTTP service tests against a mock server

use minitest::{
    AnswerSubmission, ClientError, EndpointConfig, HttpSurveyService, RemoteCall, Survey,
    SurveyService,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn service(server: &MockServer) -> HttpSurveyService {
    let endpoints = EndpointConfig::default().with_base_url(server.uri());
    HttpSurveyService::with_client(reqwest::Client::new(), &endpoints)
}

#[tokio::test]
async fn test_redeem_posts_the_code_as_a_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_surveyTokens.php"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("token=ABC123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "survey": {"survey_id": 1, "title": "T", "description": "D"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let survey = service(&server).await.redeem_code("ABC123").await.unwrap();

    assert_eq!(survey, Survey::new(1, "T", "D"));
}

#[tokio::test]
async fn test_redeem_escapes_the_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_surveyTokens.php"))
        .and(body_string_contains("token=A%26B%20C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "survey": {"survey_id": 2, "title": "T", "description": "D"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let survey = service(&server).await.redeem_code("A&B C").await.unwrap();

    assert_eq!(survey.survey_id, 2);
}

#[tokio::test]
async fn test_redeem_error_is_shown_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_surveyTokens.php"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "만료된 코드입니다."})),
        )
        .mount(&server)
        .await;

    let err = service(&server).await.redeem_code("OLD").await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidCode(_)));
    assert_eq!(err.to_string(), "만료된 코드입니다.");
}

#[tokio::test]
async fn test_redeem_without_survey_or_error_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_surveyTokens.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = service(&server).await.redeem_code("ABC123").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::NetworkError {
            call: RemoteCall::RedeemCode,
            ..
        }
    ));
    assert_eq!(err.to_string(), "An error occurred while fetching the survey.");
}

#[tokio::test]
async fn test_non_json_body_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_surveyTokens.php"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = service(&server).await.redeem_code("ABC123").await.unwrap_err();

    assert!(matches!(err, ClientError::NetworkError { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_list_questions_sends_the_survey_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_detail_list.php"))
        .and(body_json(json!({"survey_id": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "questions": [
                {
                    "question_id": 5,
                    "question_text": "Second?",
                    "question_type": "choice",
                    "question_number": 2,
                    "shuffle_options": false,
                    "created_at": "2024-01-01 00:00:00",
                    "options": [
                        {"option_text": "Yes", "option_image_path": "", "option_order": 1, "weights": {"a": 1}},
                        {"option_text": "No", "option_image_path": null, "option_order": 2}
                    ]
                },
                {
                    "question_id": 3,
                    "question_text": "First?",
                    "question_number": 1,
                    "options": []
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let questions = service(&server).await.list_questions(1).await.unwrap();

    // Returned as served; the runner sorts.
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id(), 5);
    assert_eq!(questions[0].question_type(), "choice");
    assert_eq!(questions[0].options().len(), 2);
    assert!(!questions[0].has_images());
    assert_eq!(questions[0].options()[0].weights, json!({"a": 1}));
    assert_eq!(questions[1].id(), 3);
    assert!(questions[1].options().is_empty());
}

#[tokio::test]
async fn test_list_questions_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_detail_list.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "error": "no such survey"})),
        )
        .mount(&server)
        .await;

    let err = service(&server).await.list_questions(9).await.unwrap_err();

    assert!(matches!(err, ClientError::SurveyFetchFailed { .. }));
    assert_eq!(err.reason(), Some("no such survey"));
    assert_eq!(err.to_string(), "Failed to fetch questions. Please try again.");
}

#[tokio::test]
async fn test_list_questions_rejects_a_malformed_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_detail_list.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "questions": [{"question_id": "not a number"}]
        })))
        .mount(&server)
        .await;

    let err = service(&server).await.list_questions(1).await.unwrap_err();

    assert!(matches!(err, ClientError::SurveyFetchFailed { .. }));
}

#[tokio::test]
async fn test_list_questions_requires_a_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_detail_list.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "questions": {}})),
        )
        .mount(&server)
        .await;

    let err = service(&server).await.list_questions(1).await.unwrap_err();

    assert!(matches!(err, ClientError::SurveyFetchFailed { .. }));
}

#[tokio::test]
async fn test_submit_answer_posts_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_answer.php"))
        .and(body_json(json!({
            "token": "ABC123",
            "survey_id": 1,
            "question_id": 3,
            "answer_text": "Yes",
            "current_round": 1,
            "weight_adjustment": {}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let submission = AnswerSubmission::new(Some("ABC123".into()), 1, 3, "Yes", 1);
    service(&server).await.submit_answer(&submission).await.unwrap();
}

#[tokio::test]
async fn test_submit_answer_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/minitest_answer.php"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"status": "error", "error": "db down"})),
        )
        .mount(&server)
        .await;

    let submission = AnswerSubmission::new(Some("ABC123".into()), 1, 3, "Yes", 1);
    let err = service(&server).await.submit_answer(&submission).await.unwrap_err();

    assert!(matches!(err, ClientError::SubmitFailed { .. }));
    assert_eq!(err.reason(), Some("db down"));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let service = service(&server).await;
    drop(server);

    let err = service.list_questions(1).await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::NetworkError {
            call: RemoteCall::ListQuestions,
            ..
        }
    ));
}
