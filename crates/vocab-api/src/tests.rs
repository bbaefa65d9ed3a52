//! Router tests: full requests through [`crate::router`] against an in-memory
//! store and a manual clock.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::IntoResponse,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;
use vocab_core::{
  clock::{Clock, ManualClock},
  dictionary::{CacheSource, CuratedSource, Dictionary, SourceError, WordSource},
  record::{ReviewRecord, ReviewStatus},
  schedule::record_outcome,
  store::{Cas, VocabStore},
  user::{NewUser, ProfileUpdate, User},
  word::{Accents, CachedWord, TagCount, WordDetail, WordInfo},
  wordbook::{NewWordbook, UserWordbook, Wordbook, WordbookCategory},
};
use vocab_dict::LocalDictionary;
use vocab_store_sqlite::SqliteStore;

use crate::{ApiError, AppState, TokenKeys, router};

/// Stands in for the online dictionary: knows every word starting with `q`.
struct Remote;

#[async_trait]
impl WordSource for Remote {
  fn name(&self) -> &'static str { "remote" }

  async fn try_lookup(&self, word: &str) -> Result<Option<WordInfo>, SourceError> {
    Ok(word.starts_with('q').then(|| WordInfo {
      word:        word.to_owned(),
      phonetic:    Accents::default(),
      audio_url:   Accents::default(),
      definitions: vec![format!("noun. a {word}")],
      translation: None,
      examples:    vec![],
    }))
  }
}

/// A store where another writer always updates a record between the moment a
/// handler reads it and the moment it writes it back.
struct Racing {
  inner: SqliteStore,
}

impl VocabStore for Racing {
  type Error = vocab_store_sqlite::Error;

  async fn create_user(&self, input: NewUser) -> Result<User, Self::Error> {
    self.inner.create_user(input).await
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Self::Error> {
    self.inner.get_user(id).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
    self.inner.find_user_by_email(email).await
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> Result<Option<User>, Self::Error> {
    self.inner.update_profile(id, update).await
  }

  async fn find_record(
    &self,
    user_id: Uuid,
    word: &str,
  ) -> Result<Option<ReviewRecord>, Self::Error> {
    let read = self.inner.find_record(user_id, word).await?;
    if let Some(current) = read.clone() {
      let at = current.last_review_at + Duration::seconds(1);
      let other = record_outcome(Some(current), user_id, word, ReviewStatus::Known, at)
        .unwrap();
      self.inner.upsert_record(other).await?;
    }
    Ok(read)
  }

  async fn upsert_record(
    &self,
    record: ReviewRecord,
  ) -> Result<Cas<ReviewRecord>, Self::Error> {
    self.inner.upsert_record(record).await
  }

  async fn find_due(
    &self,
    user_id: Uuid,
    now: chrono::DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<ReviewRecord>, Self::Error> {
    self.inner.find_due(user_id, now, limit).await
  }

  async fn list_records(&self, user_id: Uuid) -> Result<Vec<ReviewRecord>, Self::Error> {
    self.inner.list_records(user_id).await
  }

  async fn get_word_detail(&self, word: &str) -> Result<Option<WordDetail>, Self::Error> {
    self.inner.get_word_detail(word).await
  }

  async fn upsert_word_detail(&self, detail: WordDetail) -> Result<(), Self::Error> {
    self.inner.upsert_word_detail(detail).await
  }

  async fn words_by_tag(
    &self,
    tag: &str,
    offset: u64,
    limit: u32,
  ) -> Result<(Vec<WordDetail>, u64), Self::Error> {
    self.inner.words_by_tag(tag, offset, limit).await
  }

  async fn tag_counts(&self) -> Result<Vec<TagCount>, Self::Error> {
    self.inner.tag_counts().await
  }

  async fn get_cached_word(&self, word: &str) -> Result<Option<CachedWord>, Self::Error> {
    self.inner.get_cached_word(word).await
  }

  async fn cache_word(
    &self,
    info: WordInfo,
    cached_at: chrono::DateTime<Utc>,
  ) -> Result<(), Self::Error> {
    self.inner.cache_word(info, cached_at).await
  }

  async fn purge_word_cache(
    &self,
    cutoff: chrono::DateTime<Utc>,
  ) -> Result<usize, Self::Error> {
    self.inner.purge_word_cache(cutoff).await
  }

  async fn replace_preset_wordbooks(
    &self,
    books: Vec<NewWordbook>,
  ) -> Result<Vec<Wordbook>, Self::Error> {
    self.inner.replace_preset_wordbooks(books).await
  }

  async fn list_preset_wordbooks(&self) -> Result<Vec<Wordbook>, Self::Error> {
    self.inner.list_preset_wordbooks().await
  }

  async fn get_wordbook(&self, id: Uuid) -> Result<Option<Wordbook>, Self::Error> {
    self.inner.get_wordbook(id).await
  }

  async fn find_user_wordbook(
    &self,
    user_id: Uuid,
    wordbook_id: Option<Uuid>,
  ) -> Result<Option<UserWordbook>, Self::Error> {
    self.inner.find_user_wordbook(user_id, wordbook_id).await
  }

  async fn save_user_wordbook(
    &self,
    book: UserWordbook,
  ) -> Result<UserWordbook, Self::Error> {
    self.inner.save_user_wordbook(book).await
  }

  async fn delete_user_wordbook(
    &self,
    user_id: Uuid,
    wordbook_id: Uuid,
  ) -> Result<bool, Self::Error> {
    self.inner.delete_user_wordbook(user_id, wordbook_id).await
  }

  async fn list_user_wordbooks(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<UserWordbook>, Self::Error> {
    self.inner.list_user_wordbooks(user_id).await
  }
}

struct Harness {
  state: AppState<SqliteStore>,
  clock: Arc<ManualClock>,
}

async fn harness() -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let clock = Arc::new(ManualClock::new(
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
  ));
  let dyn_clock: Arc<dyn Clock> = clock.clone();
  let dictionary = Dictionary::new()
    .with_source(LocalDictionary)
    .with_source(CuratedSource::new(store.clone()))
    .with_source(CacheSource::new(store.clone(), dyn_clock.clone(), Duration::days(7)))
    .with_source(Remote);

  Harness {
    state: AppState {
      store,
      dictionary,
      clock: dyn_clock,
      tokens: Arc::new(TokenKeys::new(b"test-secret", Duration::days(7)).unwrap()),
    },
    clock,
  }
}

/// Send one request through `app` and decode the JSON body.
async fn send(
  app: axum::Router,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

impl Harness {
  async fn call(
    &self,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    send(router(self.state.clone()), method, uri, token, body).await
  }

  /// Register a user and return their token.
  async fn register(&self, email: &str) -> String {
    let (status, body) = self
      .call(
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "secret1", "nickname": "Learner" })),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["token"].as_str().unwrap().to_owned()
  }

  async fn seed_presets(&self) -> Vec<Wordbook> {
    self
      .state
      .store
      .replace_preset_wordbooks(vec![
        NewWordbook {
          name:        "CET4 Core".into(),
          description: "College English Test band 4".into(),
          category:    WordbookCategory::Cet4,
          words:       vec!["abandon".into(), "ability".into(), "able".into()],
        },
        NewWordbook {
          name:        "IELTS Core".into(),
          description: "IELTS".into(),
          category:    WordbookCategory::Ielts,
          words:       vec!["abandon".into()],
        },
      ])
      .await
      .unwrap()
  }
}

// ─── Health and routing ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_needs_no_token() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/api/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
  assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/api/nope", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], 404);
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
  let h = harness().await;
  let (status, body) = h
    .call(
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "email": " Ann@Example.com", "password": "secret1", "nickname": "Ann" })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["code"], 200);
  assert_eq!(body["data"]["user"]["email"], "ann@example.com");
  assert!(body["data"]["token"].is_string());

  let (status, body) = h
    .call(
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "ann@example.com", "password": "secret1" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["user"]["nickname"], "Ann");

  let token = body["data"]["token"].as_str().unwrap();
  let (status, _) = h.call("GET", "/api/auth/profile", Some(token), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_look_the_same() {
  let h = harness().await;
  h.register("ann@example.com").await;

  let (wrong_pw, a) = h
    .call(
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "ann@example.com", "password": "nope-nope" })),
    )
    .await;
  let (no_user, b) = h
    .call(
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "bob@example.com", "password": "secret1" })),
    )
    .await;
  assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
  assert_eq!(no_user, StatusCode::UNAUTHORIZED);
  assert_eq!(a["code"], 401);
  assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn register_validates_input() {
  let h = harness().await;
  h.register("ann@example.com").await;

  let cases = [
    json!({ "email": "x@example.com", "password": "12345", "nickname": "X" }),
    json!({ "email": "x@example.com", "password": "secret1" }),
    json!({ "email": "ANN@example.com", "password": "secret1", "nickname": "Dup" }),
  ];
  for case in cases {
    let (status, body) = h.call("POST", "/api/auth/register", None, Some(case)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 400);
  }
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
  let h = harness().await;
  let (status, body) = h.call("GET", "/api/word/progress", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], 401);

  let (status, _) = h.call("GET", "/api/word/progress", Some("forged.token"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_expires_with_the_clock() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  h.clock.advance(Duration::days(7));
  let (status, _) = h.call("GET", "/api/auth/profile", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_ignores_blank_fields() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;

  let (status, body) = h
    .call(
      "PUT",
      "/api/auth/profile",
      Some(&token),
      Some(json!({ "nickname": "  ", "avatar": "https://img.example/a.png" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["nickname"], "Learner");
  assert_eq!(body["data"]["avatar"], "https://img.example/a.png");
  assert!(body["data"].get("passwordHash").is_none());
}

// ─── Words ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_walks_the_tiers() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;

  let (status, body) = h
    .call("GET", "/api/word/search?word=Apple", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["translation"], "n. 苹果");

  let (status, _) = h
    .call("GET", "/api/word/search?word=quokka", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::OK);
  assert!(h.state.store.get_cached_word("quokka").await.unwrap().is_some());

  let (status, body) = h
    .call("GET", "/api/word/search?word=zzzz", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], 404);

  let (status, _) = h
    .call("GET", "/api/word/search?word=%20", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn record_progress_and_review() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;

  let (status, body) = h
    .call(
      "POST",
      "/api/word/record",
      Some(&token),
      Some(json!({ "word": "Apple", "status": "known" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["word"], "apple");
  assert_eq!(body["data"]["reviewCount"], 1);
  assert_eq!(body["data"]["correctCount"], 1);
  assert_eq!(body["data"]["version"], 1);

  h.call(
    "POST",
    "/api/word/record",
    Some(&token),
    Some(json!({ "word": "book", "status": "unknown" })),
  )
  .await;

  // Nothing is due until the first rung has passed.
  let (_, body) = h.call("GET", "/api/word/review", Some(&token), None).await;
  assert_eq!(body["data"], json!([]));

  h.clock.advance(Duration::minutes(5));
  let (status, body) = h
    .call("GET", "/api/word/review?limit=1", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::OK);
  let due = body["data"].as_array().unwrap();
  assert_eq!(due.len(), 1);
  assert_eq!(due[0]["word"], "apple");
  assert_eq!(due[0]["wordInfo"]["translation"], "n. 苹果");

  let (_, body) = h.call("GET", "/api/word/progress", Some(&token), None).await;
  assert_eq!(
    body["data"],
    json!({ "total": 2, "known": 1, "learning": 0, "unknown": 1 })
  );

  // A second `known` climbs to the 12-hour rung.
  let (_, body) = h
    .call(
      "POST",
      "/api/word/record",
      Some(&token),
      Some(json!({ "word": "apple", "status": "known" })),
    )
    .await;
  assert_eq!(body["data"]["correctCount"], 2);
  assert_eq!(body["data"]["version"], 2);
}

#[tokio::test]
async fn record_rejects_bad_outcome() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;

  for body in [
    json!({ "word": "apple", "status": "mastered" }),
    json!({ "word": "  ", "status": "known" }),
    json!({ "word": "apple" }),
  ] {
    let (status, _) = h.call("POST", "/api/word/record", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
  let (_, body) = h.call("GET", "/api/word/progress", Some(&token), None).await;
  assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn add_word_goes_to_default_wordbook() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;

  let (status, body) = h
    .call("POST", "/api/word/add", Some(&token), Some(json!({ "word": " Apple " })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["word"], "apple");

  let (status, _) = h
    .call("POST", "/api/word/add", Some(&token), Some(json!({ "word": "APPLE" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, body) = h.call("GET", "/api/word/list", Some(&token), None).await;
  let books = body["data"].as_array().unwrap();
  assert_eq!(books.len(), 1);
  assert_eq!(books[0]["customName"], "My Wordbook");
  assert_eq!(books[0]["words"][0]["source"], "search");
  assert!(books[0]["preset"].is_null());
}

#[tokio::test]
async fn words_by_tag_and_tag_counts() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  for (word, frequency) in [("alpha", 5), ("beta", 9)] {
    h.state
      .store
      .upsert_word_detail(WordDetail {
        word:        word.into(),
        phonetic:    Accents::default(),
        audio_url:   Accents::default(),
        definitions: vec![],
        translation: String::new(),
        pos:         "noun".into(),
        examples:    vec![],
        tags:        vec!["CET4".into()],
        difficulty:  1,
        frequency,
      })
      .await
      .unwrap();
  }

  let (status, body) = h
    .call("GET", "/api/word/by-tag/CET4?page=2&limit=1", Some(&token), None)
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["total"], 2);
  assert_eq!(body["data"]["totalPages"], 2);
  assert_eq!(body["data"]["page"], 2);
  assert_eq!(body["data"]["words"][0]["word"], "alpha");

  let (_, body) = h.call("GET", "/api/word/tags", Some(&token), None).await;
  assert_eq!(body["data"], json!([{ "tag": "CET4", "count": 2 }]));
}

#[tokio::test]
async fn record_lost_to_concurrent_update_is_409() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  let (status, _) = h
    .call(
      "POST",
      "/api/word/record",
      Some(&token),
      Some(json!({ "word": "apple", "status": "known" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);

  let racing = AppState {
    store:      Arc::new(Racing { inner: (*h.state.store).clone() }),
    dictionary: h.state.dictionary.clone(),
    clock:      h.state.clock.clone(),
    tokens:     h.state.tokens.clone(),
  };
  let (status, body) = send(
    router(racing),
    "POST",
    "/api/word/record",
    Some(&token),
    Some(json!({ "word": "apple", "status": "unknown" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], 409);

  // Only the other writer's update landed.
  let user = h
    .state
    .store
    .find_user_by_email("ann@example.com")
    .await
    .unwrap()
    .unwrap();
  let stored = h.state.store.find_record(user.id, "apple").await.unwrap().unwrap();
  assert_eq!(stored.version, 2);
  assert_eq!(stored.status, ReviewStatus::Known);
  assert_eq!(stored.correct_count, 2);
}

#[tokio::test]
async fn recorded_response_matches_stored_record() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  h.clock.advance(Duration::nanoseconds(123_456_789));

  let (_, body) = h
    .call(
      "POST",
      "/api/word/record",
      Some(&token),
      Some(json!({ "word": "apple", "status": "known" })),
    )
    .await;
  let (_, progress) = h.call("GET", "/api/word/progress", Some(&token), None).await;
  assert_eq!(progress["data"]["known"], 1);

  h.clock.advance(Duration::minutes(5));
  let (_, due) = h.call("GET", "/api/word/review", Some(&token), None).await;
  let due = &due["data"][0];
  for field in ["lastReviewAt", "nextReviewAt", "createdAt", "updatedAt", "version"] {
    assert_eq!(body["data"][field], due[field], "{field}");
  }
}

// ─── Wordbooks ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn preset_list_is_public_and_omits_words() {
  let h = harness().await;
  h.seed_presets().await;

  let (status, body) = h.call("GET", "/api/wordbook/preset", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let books = body["data"].as_array().unwrap();
  assert_eq!(books.len(), 2);
  assert_eq!(books[0]["category"], "CET4");
  assert_eq!(books[0]["wordCount"], 3);
  assert!(books[0].get("words").is_none());
}

#[tokio::test]
async fn wordbook_detail_pages_words() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  let books = h.seed_presets().await;

  let uri = format!("/api/wordbook/{}?page=2&limit=2", books[0].id);
  let (status, body) = h.call("GET", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["name"], "CET4 Core");
  assert_eq!(body["data"]["words"], json!(["able"]));
  assert_eq!(
    body["data"]["pagination"],
    json!({ "page": 2, "limit": 2, "total": 3, "totalPages": 2 })
  );

  let missing = format!("/api/wordbook/{}", uuid::Uuid::new_v4());
  let (status, _) = h.call("GET", &missing, Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = h.call("GET", "/api/wordbook/not-a-uuid", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subscribe_and_unsubscribe() {
  let h = harness().await;
  let token = h.register("ann@example.com").await;
  let books = h.seed_presets().await;
  let uri = format!("/api/wordbook/subscribe/{}", books[0].id);

  let (status, body) = h.call("POST", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["customName"], "CET4 Core");
  assert_eq!(body["data"]["words"].as_array().unwrap().len(), 3);
  assert_eq!(body["data"]["words"][0]["source"], "preset");

  let (status, _) = h.call("POST", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, body) = h
    .call("GET", "/api/wordbook/user/subscribed", Some(&token), None)
    .await;
  let subscribed = body["data"].as_array().unwrap();
  assert_eq!(subscribed.len(), 1);
  assert_eq!(subscribed[0]["preset"]["name"], "CET4 Core");

  let (status, _) = h.call("DELETE", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = h.call("DELETE", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (_, body) = h
    .call("GET", "/api/wordbook/user/subscribed", Some(&token), None)
    .await;
  assert_eq!(body["data"], json!([]));

  let missing = format!("/api/wordbook/subscribe/{}", uuid::Uuid::new_v4());
  let (status, _) = h.call("POST", &missing, Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Error mapping ───────────────────────────────────────────────────────────

#[tokio::test]
async fn conflict_and_store_errors_render_as_envelopes() {
  let resp = ApiError::Conflict("retry".into()).into_response();
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  let resp = ApiError::store(std::io::Error::other("disk on fire")).into_response();
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["code"], 500);
  assert!(!body["message"].as_str().unwrap().contains("disk"));
}
