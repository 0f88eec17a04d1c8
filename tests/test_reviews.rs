use std::sync::Arc;

use cinema_reviews_be::{
    db::review::{create_review, delete_review, list_reviews_for_subject, update_review},
    errors::AppError,
    models::{
        Actor, Subject, UserRole,
        catalog::{NewMovie, NewSeries},
        review::NewReview,
        subject::SubjectRef,
        user::NewUser,
    },
    state::SharedStore,
    store::{CinemaStore, MemoryStore},
};

struct Fixture {
    memory: MemoryStore,
    store: SharedStore,
    movie_id: i32,
    series_id: i32,
}

async fn setup() -> Fixture {
    let memory = MemoryStore::new();
    let movie = memory
        .insert_movie(NewMovie {
            title: "Heat".into(),
            director: "Michael Mann".into(),
            genre: "Crime".into(),
            box_office: Some(187_436_818.0),
        })
        .await;
    let series = memory
        .insert_series(NewSeries {
            title: "The Wire".into(),
            genre: "Crime".into(),
        })
        .await;

    Fixture {
        store: Arc::new(memory.clone()),
        memory,
        movie_id: movie.id,
        series_id: series.id,
    }
}

async fn add_user(store: &SharedStore, email: &str, role: UserRole) -> Actor {
    let user = store
        .insert_user(NewUser {
            email: email.into(),
            password_hash: "unused".into(),
            role,
        })
        .await
        .unwrap();

    Actor {
        id: user.id,
        role: user.role,
    }
}

fn movie_ref(id: i32) -> SubjectRef {
    SubjectRef {
        movie_id: Some(id),
        series_id: None,
    }
}

#[tokio::test]
async fn second_review_on_same_subject_is_a_conflict() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();

    let err = create_review(alice.id, movie_ref(fx.movie_id), "Again", 4, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn same_user_may_review_a_movie_and_a_series() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();
    let series_review = create_review(
        alice.id,
        SubjectRef {
            movie_id: None,
            series_id: Some(fx.series_id),
        },
        "Even better",
        5,
        fx.store.clone(),
    )
    .await
    .unwrap();

    assert_eq!(series_review.series_id, Some(fx.series_id));
    assert_eq!(series_review.movie_id, None);
}

#[tokio::test]
async fn ambiguous_or_missing_subject_is_rejected() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let both = SubjectRef {
        movie_id: Some(fx.movie_id),
        series_id: Some(fx.series_id),
    };
    let err = create_review(alice.id, both, "Hmm", 3, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = create_review(alice.id, SubjectRef::default(), "Hmm", 3, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn out_of_bounds_input_is_rejected() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    for (text, rating) in [("Fine", 0), ("Fine", 6), ("   ", 3)] {
        let err = create_review(alice.id, movie_ref(fx.movie_id), text, rating, fx.store.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{text:?}/{rating}");
    }
}

#[tokio::test]
async fn reviewing_a_missing_movie_is_not_found() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let err = create_review(alice.id, movie_ref(9999), "Great", 5, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn listing_is_newest_first() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;
    let bob = add_user(&fx.store, "bob@example.com", UserRole::User).await;

    let a = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();
    let b = create_review(bob.id, movie_ref(fx.movie_id), "Fine", 3, fx.store.clone())
        .await
        .unwrap();

    let listed = list_reviews_for_subject(Subject::Movie(fx.movie_id), fx.store.clone())
        .await
        .unwrap();
    let ids: Vec<i32> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(listed[0].user_email, "bob@example.com");
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn listing_without_reviews_is_empty_not_an_error() {
    let fx = setup().await;
    let listed = list_reviews_for_subject(Subject::Series(fx.series_id), fx.store.clone())
        .await
        .unwrap();
    assert!(listed.is_empty());

    let err = list_reviews_for_subject(Subject::Movie(424242), fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn only_the_owner_may_update() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;
    let bob = add_user(&fx.store, "bob@example.com", UserRole::User).await;
    let admin = add_user(&fx.store, "admin@example.com", UserRole::Admin).await;

    let review = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();
    assert!(review.updated_at.is_none());

    for intruder in [bob, admin] {
        let err = update_review(intruder, review.id, "Mine now", 1, fx.store.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    let updated = update_review(alice, review.id, "Still great", 4, fx.store.clone())
        .await
        .unwrap();
    assert_eq!(updated.text, "Still great");
    assert_eq!(updated.rating, 4);
    let updated_at = updated.updated_at.expect("timestamp set on update");
    assert!(updated_at >= updated.created_at);
}

#[tokio::test]
async fn updating_a_missing_review_is_not_found() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let err = update_review(alice, 777, "text", 3, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn admin_may_delete_but_other_users_may_not() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;
    let bob = add_user(&fx.store, "bob@example.com", UserRole::User).await;
    let admin = add_user(&fx.store, "admin@example.com", UserRole::Admin).await;

    let review = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();

    let err = delete_review(bob, review.id, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    delete_review(admin, review.id, fx.store.clone())
        .await
        .unwrap();
    assert!(fx.store.find_review(review.id).await.unwrap().is_none());

    let err = delete_review(alice, review.id, fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn owner_may_delete_and_review_again() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let review = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();
    delete_review(alice, review.id, fx.store.clone())
        .await
        .unwrap();

    create_review(alice.id, movie_ref(fx.movie_id), "Rewatched", 4, fx.store.clone())
        .await
        .unwrap();
}

#[tokio::test]
async fn average_rating_follows_review_changes() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;
    let bob = add_user(&fx.store, "bob@example.com", UserRole::User).await;

    let average = |store: SharedStore, id: i32| async move {
        store.find_movie(id).await.unwrap().unwrap().average_rating
    };

    let a = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();
    create_review(bob.id, movie_ref(fx.movie_id), "Okay", 2, fx.store.clone())
        .await
        .unwrap();
    assert_eq!(average(fx.store.clone(), fx.movie_id).await, 3.5);

    update_review(alice, a.id, "Good", 4, fx.store.clone())
        .await
        .unwrap();
    assert_eq!(average(fx.store.clone(), fx.movie_id).await, 3.0);

    delete_review(alice, a.id, fx.store.clone()).await.unwrap();
    assert_eq!(average(fx.store.clone(), fx.movie_id).await, 2.0);
}

#[tokio::test]
async fn store_rejects_a_second_insert_for_the_same_subject() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let new_review = |text: &str| NewReview {
        user_id: alice.id,
        subject: Subject::Movie(fx.movie_id),
        text: text.into(),
        rating: 4,
    };

    fx.store.insert_review(new_review("One")).await.unwrap();
    let err = fx.store.insert_review(new_review("Two")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // A series with the same id is a different subject.
    fx.store
        .insert_review(NewReview {
            subject: Subject::Series(fx.series_id),
            ..new_review("Three")
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn joined_creates_for_the_same_subject_leave_one_review() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let first = create_review(alice.id, movie_ref(fx.movie_id), "One", 5, fx.store.clone());
    let second = create_review(alice.id, movie_ref(fx.movie_id), "Two", 4, fx.store.clone());
    let (first, second) = tokio::join!(first, second);

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_))))
    );
}

#[tokio::test]
async fn deleting_a_movie_cascades_to_its_reviews() {
    let fx = setup().await;
    let alice = add_user(&fx.store, "alice@example.com", UserRole::User).await;

    let review = create_review(alice.id, movie_ref(fx.movie_id), "Great", 5, fx.store.clone())
        .await
        .unwrap();

    fx.memory.delete_movie(fx.movie_id).await.unwrap();
    assert!(fx.store.find_review(review.id).await.unwrap().is_none());
    let err = list_reviews_for_subject(Subject::Movie(fx.movie_id), fx.store.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
