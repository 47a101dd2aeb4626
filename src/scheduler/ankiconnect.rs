//! AnkiConnect-backed scheduler
//!
//! Speaks the AnkiConnect JSON protocol: every call is a POST of
//! `{action, version: 6, params}` to the service root, answered by
//! `{result, error}`.

use super::{Card, CardScheduler, SchedulerError};
use crate::media::AudioPlayer;
use crate::text;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const API_VERSION: u32 = 6;

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    action: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

/// Review-screen card payload as AnkiConnect reports it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentCard {
    question: String,
    answer: String,
    #[serde(default)]
    buttons: Vec<i64>,
    #[serde(default)]
    next_reviews: Vec<String>,
}

impl From<CurrentCard> for Card {
    fn from(wire: CurrentCard) -> Self {
        let mut audio_files = text::audio_refs(&wire.question);
        audio_files.extend(text::audio_refs(&wire.answer));
        Card {
            question: text::plain_text(&wire.question),
            answer: text::plain_text(&wire.answer),
            buttons: wire.buttons,
            next_reviews: wire.next_reviews,
            audio_files,
        }
    }
}

pub struct AnkiConnectScheduler {
    client: Client,
    base_url: String,
    player: Box<dyn AudioPlayer>,
    deck: Option<String>,
    card: Option<Card>,
    needs_attempt: bool,
}

impl AnkiConnectScheduler {
    pub fn new(base_url: &str, player: Box<dyn AudioPlayer>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            player,
            deck: None,
            card: None,
            needs_attempt: false,
        }
    }

    /// One protocol round trip. `Ok(None)` means the action succeeded with a
    /// null result.
    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<Option<T>, SchedulerError> {
        let request = ApiRequest {
            action,
            version: API_VERSION,
            params,
        };

        let response: ApiResponse<T> = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(SchedulerError::Api(error));
        }
        Ok(response.result)
    }

    async fn fetch_current_card(&self) -> Result<Card, SchedulerError> {
        // Once the deck runs dry Anki leaves the review screen, and
        // guiCurrentCard reports the review as no longer active.
        match self.invoke::<CurrentCard>("guiCurrentCard", None).await {
            Ok(Some(wire)) => Ok(wire.into()),
            Ok(None) => Err(SchedulerError::DeckExhausted),
            Err(SchedulerError::Api(msg)) if msg.contains("not currently active") => {
                Err(SchedulerError::DeckExhausted)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_clip(&self, filename: &str) -> Result<Option<Vec<u8>>, SchedulerError> {
        let result: Option<Value> = self
            .invoke("retrieveMediaFile", Some(json!({ "filename": filename })))
            .await?;

        // A missing file comes back as `false` rather than an error.
        match result {
            Some(Value::String(encoded)) => match BASE64.decode(encoded.as_bytes()) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "bad media payload, skipping");
                    Ok(None)
                }
            },
            _ => {
                tracing::warn!(file = %filename, "media file not found, skipping");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CardScheduler for AnkiConnectScheduler {
    async fn start_session(&mut self, deck: &str) -> Result<(), SchedulerError> {
        let opened: Option<bool> = self
            .invoke("guiDeckReview", Some(json!({ "name": deck })))
            .await?;
        if opened != Some(true) {
            return Err(SchedulerError::Api(format!(
                "could not open deck for review: {deck}"
            )));
        }

        tracing::info!(deck = %deck, "review session started");
        self.deck = Some(deck.to_string());
        self.card = None;
        self.needs_attempt = false;
        Ok(())
    }

    async fn stop_session(&mut self) -> Result<(), SchedulerError> {
        if self.deck.take().is_none() {
            return Ok(());
        }
        self.player.stop();
        self.card = None;
        self.needs_attempt = false;

        self.invoke::<Value>("guiDeckBrowse", None).await?;
        tracing::info!("review session released");
        Ok(())
    }

    fn current_card(&self) -> Option<Card> {
        self.card.clone()
    }

    fn needs_attempt(&self) -> bool {
        self.needs_attempt
    }

    async fn submit_grade(&mut self, ease: i64) -> Result<(), SchedulerError> {
        let card = self.card.as_ref().ok_or(SchedulerError::NoActiveCard)?;
        if !card.buttons.contains(&ease) {
            return Err(SchedulerError::GradeRejected(ease));
        }

        // The answer must be on screen before Anki will take a grade.
        self.invoke::<bool>("guiShowAnswer", None).await?;
        let answered: Option<bool> = self
            .invoke("guiAnswerCard", Some(json!({ "ease": ease })))
            .await?;
        if answered != Some(true) {
            return Err(SchedulerError::GradeRejected(ease));
        }

        tracing::debug!(ease, "grade accepted");
        self.needs_attempt = false;
        Ok(())
    }

    async fn advance(&mut self) -> Result<Card, SchedulerError> {
        let card = self.fetch_current_card().await?;
        self.card = Some(card.clone());
        self.needs_attempt = true;
        Ok(card)
    }

    async fn play_card_audio(&mut self) -> Result<(), SchedulerError> {
        let files = self
            .card
            .as_ref()
            .ok_or(SchedulerError::NoActiveCard)?
            .audio_files
            .clone();

        let mut clips = Vec::with_capacity(files.len());
        for file in &files {
            if let Some(bytes) = self.fetch_clip(file).await? {
                clips.push(bytes);
            }
        }
        if clips.is_empty() {
            return Ok(());
        }
        self.player.play(clips)?;
        Ok(())
    }

    fn stop_card_audio(&mut self) {
        self.player.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaError;

    struct NullPlayer;

    impl AudioPlayer for NullPlayer {
        fn play(&self, _clips: Vec<Vec<u8>>) -> Result<(), MediaError> {
            Ok(())
        }

        fn stop(&self) {}
    }

    fn scheduler() -> AnkiConnectScheduler {
        AnkiConnectScheduler::new(
            "http://127.0.0.1:1",
            Box::new(NullPlayer),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn request_envelope_shape() {
        let request = ApiRequest {
            action: "guiDeckReview",
            version: API_VERSION,
            params: Some(json!({ "name": "Kanji" })),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["action"], "guiDeckReview");
        assert_eq!(value["version"], 6);
        assert_eq!(value["params"]["name"], "Kanji");
    }

    #[test]
    fn envelope_omits_empty_params() {
        let request = ApiRequest {
            action: "guiCurrentCard",
            version: API_VERSION,
            params: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("params").is_none());
    }

    #[test]
    fn current_card_payload_parses() {
        let body = r#"{
            "result": {
                "question": "<div>What is 2+2?[sound:q.mp3]</div>",
                "answer": "What is 2+2?<hr id=answer>4[sound:ans.mp3]",
                "deckName": "Math",
                "css": ".card {}",
                "cardId": 1498938915662,
                "buttons": [1, 2, 3],
                "nextReviews": ["<1m", "<10m", "4d"],
                "modelName": "Basic",
                "fieldOrder": 0,
                "template": "Forward"
            },
            "error": null
        }"#;
        let parsed: ApiResponse<CurrentCard> = serde_json::from_str(body).unwrap();
        let card: Card = parsed.result.unwrap().into();

        assert_eq!(card.question, "What is 2+2?");
        assert_eq!(card.buttons, vec![1, 2, 3]);
        assert_eq!(card.next_reviews, vec!["<1m", "<10m", "4d"]);
        assert_eq!(card.audio_files, vec!["q.mp3", "ans.mp3"]);
    }

    #[tokio::test]
    async fn out_of_range_grade_is_rejected_before_any_request() {
        let mut scheduler = scheduler();
        scheduler.card = Some(Card {
            buttons: vec![1, 2, 3, 4],
            ..Card::default()
        });

        // The client points nowhere reachable, so getting a rejection back
        // proves the boundary check fired first.
        let err = scheduler.submit_grade(9).await.unwrap_err();
        assert!(matches!(err, SchedulerError::GradeRejected(9)));
    }

    #[tokio::test]
    async fn grade_without_card_is_a_contract_error() {
        let mut scheduler = scheduler();
        let err = scheduler.submit_grade(2).await.unwrap_err();
        assert!(matches!(err, SchedulerError::NoActiveCard));
    }

    #[tokio::test]
    async fn stop_session_without_start_is_a_no_op() {
        let mut scheduler = scheduler();
        scheduler.stop_session().await.unwrap();
        scheduler.stop_session().await.unwrap();
    }
}
