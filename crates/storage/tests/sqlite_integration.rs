use storage::repository::{SessionStateRepository, StateKey};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_each_key() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_state_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_state(StateKey::QuizSettings, r#"{"quizKeys":["a"],"questionCount":2}"#)
        .await
        .unwrap();
    repo.save_state(StateKey::CurrentQuestion, "1").await.unwrap();

    assert_eq!(
        repo.load_state(StateKey::QuizSettings).await.unwrap().as_deref(),
        Some(r#"{"quizKeys":["a"],"questionCount":2}"#)
    );
    assert_eq!(
        repo.load_state(StateKey::CurrentQuestion).await.unwrap().as_deref(),
        Some("1")
    );
    assert_eq!(repo.load_state(StateKey::Quiz).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_overwrites_and_clears() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_state_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_state(StateKey::QuizAnswers, "[0]").await.unwrap();
    repo.save_state(StateKey::QuizAnswers, "[1,[0,2]]").await.unwrap();
    assert_eq!(
        repo.load_state(StateKey::QuizAnswers).await.unwrap().as_deref(),
        Some("[1,[0,2]]")
    );

    repo.clear_state(StateKey::QuizAnswers).await.unwrap();
    assert_eq!(repo.load_state(StateKey::QuizAnswers).await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_state_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.save_state(StateKey::Quiz, "[]").await.unwrap();
    assert_eq!(repo.load_state(StateKey::Quiz).await.unwrap().as_deref(), Some("[]"));
}
