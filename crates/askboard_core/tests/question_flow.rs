use askboard_core::db::open_db_in_memory;
use askboard_core::{
    NewQuestion, Profile, ProfileRepository, QuestionService, ServiceError, Session,
    SqliteAnswerRepository, SqliteProfileRepository, SqliteQuestionRepository, ValidationError,
    MAX_QUESTION_TAGS,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

type SqliteQuestionService<'conn> = QuestionService<
    SqliteProfileRepository<'conn>,
    SqliteQuestionRepository<'conn>,
    SqliteAnswerRepository<'conn>,
>;

fn service(conn: &Connection) -> SqliteQuestionService<'_> {
    QuestionService::new(
        SqliteProfileRepository::try_new(conn).unwrap(),
        SqliteQuestionRepository::try_new(conn).unwrap(),
        SqliteAnswerRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn ask_question_requires_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let err = service(&conn)
        .ask_question(
            &Session::anonymous(),
            NewQuestion::from_form("title", "body", ""),
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized));
}

#[test]
fn ask_question_persists_ordered_tags_and_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let author = Uuid::new_v4();
    let service = service(&conn);

    let created = service
        .ask_question(
            &Session::signed_in(author),
            NewQuestion::from_form(" Why async? ", "Explain futures", "rust, async ,rust,,tokio"),
        )
        .unwrap();
    assert_eq!(created.title, "Why async?");
    assert_eq!(created.tags, vec!["rust", "async", "tokio"]);
    assert_eq!(created.user_id, author);
    assert_eq!(created.upvotes, 0);

    let detail = service.get_question(created.uuid).unwrap();
    assert_eq!(detail.question, created);
    assert_eq!(detail.author, "Anonymous");
}

#[test]
fn ask_question_rejects_more_than_five_tags() {
    let conn = open_db_in_memory().unwrap();
    let tags = (0..=MAX_QUESTION_TAGS)
        .map(|idx| format!("tag{idx}"))
        .collect::<Vec<_>>()
        .join(",");

    let err = service(&conn)
        .ask_question(
            &Session::signed_in(Uuid::new_v4()),
            NewQuestion::from_form("title", "body", &tags),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TooManyTags { .. })
    ));
}

#[test]
fn get_question_reports_missing_question() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();
    let err = service(&conn).get_question(missing).unwrap_err();
    assert!(matches!(err, ServiceError::QuestionNotFound(id) if id == missing));
}

#[test]
fn forum_lists_newest_first_with_authors() {
    let conn = open_db_in_memory().unwrap();
    let author = Uuid::new_v4();
    SqliteProfileRepository::try_new(&conn)
        .unwrap()
        .upsert_profile(&Profile::new(author, "mara").with_display_name("Mara"))
        .unwrap();
    let session = Session::signed_in(author);
    let service = service(&conn);

    let older = service
        .ask_question(&session, NewQuestion::from_form("older", "body", ""))
        .unwrap();
    let newer = service
        .ask_question(&session, NewQuestion::from_form("newer", "body", ""))
        .unwrap();
    for (id, created_at) in [(older.uuid, 1_000_i64), (newer.uuid, 2_000_i64)] {
        conn.execute(
            "UPDATE questions SET created_at = ?1 WHERE uuid = ?2;",
            params![created_at, id.to_string()],
        )
        .unwrap();
    }

    let listing = service.list_forum(None).unwrap();
    let titles: Vec<&str> = listing.iter().map(|e| e.question.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
    assert!(listing.iter().all(|entry| entry.author == "Mara"));
    assert!(listing.iter().all(|entry| entry.answer_count == 0));
}

#[test]
fn forum_search_matches_title_body_and_tags() {
    let conn = open_db_in_memory().unwrap();
    let session = Session::signed_in(Uuid::new_v4());
    let service = service(&conn);
    service
        .ask_question(&session, NewQuestion::from_form("Borrowing", "refs", ""))
        .unwrap();
    service
        .ask_question(&session, NewQuestion::from_form("Other", "mentions BORROW here", ""))
        .unwrap();
    service
        .ask_question(&session, NewQuestion::from_form("Tagged", "x", "borrowck"))
        .unwrap();
    service
        .ask_question(&session, NewQuestion::from_form("Unrelated", "y", "sql"))
        .unwrap();

    assert_eq!(service.list_forum(Some("borrow")).unwrap().len(), 3);
    assert_eq!(service.list_forum(Some("  ")).unwrap().len(), 4);
    assert!(service.list_forum(Some("python")).unwrap().is_empty());
}

#[test]
fn forum_listing_survives_more_questions_than_sqlite_host_parameters() {
    const QUESTION_COUNT: i64 = 33_000;
    let conn = open_db_in_memory().unwrap();
    let tagged_author = Uuid::new_v4();
    let tagged_question = Uuid::new_v4();

    let tx = conn.unchecked_transaction().unwrap();
    {
        let mut insert = tx
            .prepare(
                "INSERT INTO questions (uuid, user_id, title, body, upvotes, created_at)
                 VALUES (?1, ?2, ?3, 'body', 0, ?4);",
            )
            .unwrap();
        insert
            .execute(params![
                tagged_question.to_string(),
                tagged_author.to_string(),
                "oldest",
                0_i64
            ])
            .unwrap();
        for created_at in 1..QUESTION_COUNT {
            insert
                .execute(params![
                    Uuid::new_v4().to_string(),
                    Uuid::new_v4().to_string(),
                    format!("q{created_at}"),
                    created_at
                ])
                .unwrap();
        }
    }
    tx.execute(
        "INSERT INTO question_tags (question_uuid, position, name) VALUES (?1, 0, 'rust');",
        [tagged_question.to_string()],
    )
    .unwrap();
    tx.execute(
        "INSERT INTO answers (uuid, question_uuid, user_id, body, created_at)
         VALUES (?1, ?2, ?3, 'answer', 1);",
        params![
            Uuid::new_v4().to_string(),
            tagged_question.to_string(),
            Uuid::new_v4().to_string()
        ],
    )
    .unwrap();
    tx.commit().unwrap();
    SqliteProfileRepository::try_new(&conn)
        .unwrap()
        .upsert_profile(&Profile::new(tagged_author, "oldtimer"))
        .unwrap();

    let listing = service(&conn).list_forum(None).unwrap();
    assert_eq!(listing.len(), QUESTION_COUNT as usize);
    let oldest = listing.last().unwrap();
    assert_eq!(oldest.question.uuid, tagged_question);
    assert_eq!(oldest.question.tags, vec!["rust"]);
    assert_eq!(oldest.author, "oldtimer");
    assert_eq!(oldest.answer_count, 1);
    assert_eq!(listing[0].author, "Anonymous");
}
