use askboard_core::db::open_db_in_memory;
use askboard_core::{
    Answer, AnswerRepository, AnswerService, Profile, ProfileRepository, Question,
    QuestionRepository, ServiceError, Session, SqliteAnswerRepository, SqliteProfileRepository,
    SqliteQuestionRepository, UserId,
};
use rusqlite::Connection;
use uuid::Uuid;

type SqliteAnswerService<'conn> = AnswerService<
    SqliteProfileRepository<'conn>,
    SqliteAnswerRepository<'conn>,
    SqliteQuestionRepository<'conn>,
>;

fn service(conn: &Connection) -> SqliteAnswerService<'_> {
    AnswerService::new(
        SqliteProfileRepository::try_new(conn).unwrap(),
        SqliteAnswerRepository::try_new(conn).unwrap(),
        SqliteQuestionRepository::try_new(conn).unwrap(),
    )
}

fn seed_question(conn: &Connection, owner: UserId) -> Question {
    let question = Question::new(owner, "How do lifetimes work?", "details", &[]).unwrap();
    SqliteQuestionRepository::try_new(conn)
        .unwrap()
        .create_question(&question)
        .unwrap();
    question
}

fn seed_answer(
    conn: &Connection,
    question: &Question,
    body: &str,
    accepted: bool,
    upvotes: i64,
    created_at: i64,
) -> Answer {
    let mut answer = Answer::new(question.uuid, Uuid::new_v4(), body).unwrap();
    answer.is_accepted = accepted;
    answer.upvotes = upvotes;
    answer.created_at = created_at;
    SqliteAnswerRepository::try_new(conn)
        .unwrap()
        .create_answer(&answer)
        .unwrap();
    answer
}

#[test]
fn accepted_answer_surfaces_before_higher_voted_ones() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn, Uuid::new_v4());
    seed_answer(&conn, &question, "A", false, 10, 2_000);
    seed_answer(&conn, &question, "B", true, 1, 3_000);
    seed_answer(&conn, &question, "C", false, 10, 1_000);

    let listed = service(&conn).list_answers(question.uuid).unwrap();
    let order: Vec<&str> = listed.iter().map(|view| view.answer.body.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
}

#[test]
fn listed_answers_carry_author_names() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn, Uuid::new_v4());
    let answer = seed_answer(&conn, &question, "with author", false, 0, 1);
    SqliteProfileRepository::try_new(&conn)
        .unwrap()
        .upsert_profile(&Profile::new(answer.user_id, "rustacean"))
        .unwrap();
    seed_answer(&conn, &question, "anonymous", false, 0, 2);

    let listed = service(&conn).list_answers(question.uuid).unwrap();
    assert_eq!(listed[0].author, "rustacean");
    assert_eq!(listed[1].author, "Anonymous");
}

#[test]
fn post_answer_requires_sign_in_and_existing_question() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn, Uuid::new_v4());
    let service = service(&conn);

    let err = service
        .post_answer(&Session::anonymous(), question.uuid, "hi")
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized));

    let session = Session::signed_in(Uuid::new_v4());
    let missing = Uuid::new_v4();
    let err = service.post_answer(&session, missing, "hi").unwrap_err();
    assert!(matches!(err, ServiceError::QuestionNotFound(id) if id == missing));

    let err = service.post_answer(&session, question.uuid, "   ").unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let posted = service
        .post_answer(&session, question.uuid, "  use references  ")
        .unwrap();
    assert_eq!(posted.body, "use references");
    assert!(!posted.is_accepted);
    assert_eq!(service.list_answers(question.uuid).unwrap().len(), 1);
}

#[test]
fn accept_answer_requires_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn, Uuid::new_v4());
    let answer = seed_answer(&conn, &question, "only", false, 0, 1);
    let service = service(&conn);

    let err = service
        .accept_answer(&Session::anonymous(), answer.uuid)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized));
    assert!(!service.list_answers(question.uuid).unwrap()[0].answer.is_accepted);
}

#[test]
fn only_question_owner_can_accept_and_acceptance_is_exclusive() {
    let conn = open_db_in_memory().unwrap();
    let owner = Uuid::new_v4();
    let question = seed_question(&conn, owner);
    let first = seed_answer(&conn, &question, "first", false, 0, 1);
    let second = seed_answer(&conn, &question, "second", false, 5, 2);
    let service = service(&conn);

    let stranger = Session::signed_in(Uuid::new_v4());
    let err = service.accept_answer(&stranger, first.uuid).unwrap_err();
    assert!(matches!(err, ServiceError::NotQuestionOwner { .. }));

    let owner_session = Session::signed_in(owner);
    assert!(service.accept_answer(&owner_session, first.uuid).unwrap().is_accepted);
    assert!(service.accept_answer(&owner_session, first.uuid).unwrap().is_accepted);
    assert!(service.accept_answer(&owner_session, second.uuid).unwrap().is_accepted);

    let listed = service.list_answers(question.uuid).unwrap();
    let accepted: Vec<&str> = listed
        .iter()
        .filter(|view| view.answer.is_accepted)
        .map(|view| view.answer.body.as_str())
        .collect();
    assert_eq!(accepted, vec!["second"]);
    assert_eq!(listed[0].answer.uuid, second.uuid);
}

#[test]
fn accepting_unknown_answer_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();
    let err = service(&conn)
        .accept_answer(&Session::signed_in(Uuid::new_v4()), missing)
        .unwrap_err();
    assert!(matches!(err, ServiceError::AnswerNotFound(id) if id == missing));
}

#[test]
fn store_rejects_second_accepted_answer_written_directly() {
    let conn = open_db_in_memory().unwrap();
    let question = seed_question(&conn, Uuid::new_v4());
    seed_answer(&conn, &question, "one", true, 0, 1);

    let mut duplicate = Answer::new(question.uuid, Uuid::new_v4(), "two").unwrap();
    duplicate.is_accepted = true;
    let result = SqliteAnswerRepository::try_new(&conn)
        .unwrap()
        .create_answer(&duplicate);
    assert!(result.is_err());
}
