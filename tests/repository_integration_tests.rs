//! Postgres-backed repository tests.
//!
//! These need a reachable database: set DATABASE_URL and run with
//! `cargo test -- --ignored`. Each test creates its own uniquely-named rows so
//! runs can share one database.

use fashion_blog::{
    identifier::generate_uuid,
    models::{NewPost, NewUser, Role, User},
    repository::{PostgresRepository, Repository, RepositoryError},
};
use sqlx::PgPool;
use tokio::test;

// --- Test Context and Setup ---

struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

async fn create_test_user(repo: &PostgresRepository, role: Role) -> User {
    let uuid = generate_uuid();
    repo.create_user(NewUser {
        email: format!("{}@blog.test", uuid),
        uuid,
        name: "Repo Tester".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role,
    })
    .await
    .expect("Failed to create test user")
}

fn new_post(title: &str, content: &str, category_id: i64, user_id: i64) -> NewPost {
    NewPost {
        uuid: generate_uuid(),
        title: title.to_string(),
        content: content.to_string(),
        category_id,
        user_id,
    }
}

// --- Tests ---

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_user_roundtrip_and_duplicate_email() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let user = create_test_user(&repo, Role::Admin).await;
    assert_eq!(user.role, Role::Admin);

    let by_id = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, user.email);
    let by_email = repo.find_user_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    let duplicate = repo
        .create_user(NewUser {
            uuid: generate_uuid(),
            name: "Copy".to_string(),
            email: user.email.clone(),
            password_hash: "x".to_string(),
            role: Role::Regular,
        })
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Duplicate(_))));
}

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_seeded_categories_are_lowercase() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();

    let categories = repo.list_categories().await.unwrap();
    assert!(categories.iter().any(|c| c.name == "streetwear"));
    assert!(categories.iter().all(|c| c.name == c.name.to_lowercase()));

    let found = repo.find_category_by_name("streetwear").await.unwrap().unwrap();
    let by_uuid = repo.find_category_by_uuid(&found.uuid).await.unwrap().unwrap();
    assert_eq!(by_uuid.id, found.id);
    assert!(repo.find_category_by_uuid("missing").await.unwrap().is_none());
}

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_post_lifecycle() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let author = create_test_user(&repo, Role::Admin).await;
    let category = repo.find_category_by_name("vintage").await.unwrap().unwrap();

    let created = repo
        .create_post(new_post("Thrift haul", "Old denim.", category.id, author.id))
        .await
        .unwrap();
    assert_eq!(created.category_name, "vintage");
    assert!(created.updated_at.is_none());

    let updated = repo
        .update_post(created.id, "Thrift haul II", "More denim.")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Thrift haul II");
    assert_eq!(updated.category_id, category.id);
    assert!(updated.updated_at.is_some());

    let in_category = repo.list_posts_by_category(category.id).await.unwrap();
    assert!(in_category.iter().any(|p| p.id == created.id));

    assert!(repo.delete_post(created.id).await.unwrap());
    assert!(!repo.delete_post(created.id).await.unwrap());
    assert!(repo.find_post_by_uuid(&created.uuid).await.unwrap().is_none());
    assert!(repo.update_post(created.id, "x", "y").await.unwrap().is_none());
}

#[test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_search_is_case_insensitive_and_literal() {
    let ctx = DbTestContext::setup().await;
    let repo = ctx.repository();
    let author = create_test_user(&repo, Role::Admin).await;
    let category = repo.find_category_by_name("beauty").await.unwrap().unwrap();

    let marker = generate_uuid();
    let post = repo
        .create_post(new_post(
            &format!("Glow {}", marker),
            "100% natural serums",
            category.id,
            author.id,
        ))
        .await
        .unwrap();

    let hits = repo.search_posts(&marker.to_uppercase()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, post.id);

    // `%` is matched literally, not as a wildcard.
    let literal = repo.search_posts("100% natural").await.unwrap();
    assert!(literal.iter().any(|p| p.id == post.id));
    let wildcard = repo.search_posts(&format!("{}%zzz", marker)).await.unwrap();
    assert!(wildcard.is_empty());

    repo.delete_post(post.id).await.unwrap();
}
