//! Integration tests for the owner-scoped repositories.
//!
//! Exercises the repository layer against a real database:
//! - Ownership scoping for every project and task operation
//! - Cascade delete from project to tasks
//! - Atomic completion toggle and bounded priority adjustment
//! - Task ordering by descending priority

use assert_matches::assert_matches;
use chrono::{Days, Utc};
use sqlx::PgPool;
use taskboard_core::tasks::{default_deadline, MAX_PRIORITY, MIN_PRIORITY};
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use taskboard_db::models::task::{CreateTask, Task, UpdateTask};
use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::{ProjectRepo, TaskRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

async fn new_project(pool: &PgPool, owner_id: DbId, name: &str) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            owner_id,
            name: name.to_string(),
        },
    )
    .await
    .expect("project creation should succeed")
}

async fn new_task(pool: &PgPool, owner_id: DbId, project_id: DbId, content: &str) -> Task {
    let today = Utc::now().date_naive();
    TaskRepo::create(
        pool,
        owner_id,
        &CreateTask {
            project_id,
            content: content.to_string(),
            deadline: default_deadline(today),
        },
    )
    .await
    .expect("task creation should succeed")
    .expect("project should be owned")
}

async fn set_priority(pool: &PgPool, task_id: DbId, priority: i32) {
    sqlx::query("UPDATE tasks SET priority = $2 WHERE id = $1")
        .bind(task_id)
        .bind(priority)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_projects_are_listed_per_owner_in_insertion_order(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;

    let groceries = new_project(&pool, alice, "Groceries").await;
    let work = new_project(&pool, alice, "Work").await;
    new_project(&pool, bob, "Bob's").await;

    let listed = ProjectRepo::list_by_owner(&pool, alice).await.unwrap();
    let ids: Vec<DbId> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![groceries.id, work.id]);

    let bobs = ProjectRepo::list_by_owner(&pool, bob).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert!(bobs.iter().all(|p| p.name != "Groceries"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_access_is_scoped_to_owner(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;

    assert!(ProjectRepo::find_owned(&pool, project.id, bob).await.unwrap().is_none());

    let rename = UpdateProject {
        name: "Hijacked".to_string(),
    };
    assert!(ProjectRepo::update(&pool, project.id, bob, &rename).await.unwrap().is_none());
    assert!(!ProjectRepo::delete(&pool, project.id, bob).await.unwrap());

    let still_there = ProjectRepo::find_owned(&pool, project.id, alice)
        .await
        .unwrap()
        .expect("owner must still see the project");
    assert_eq!(still_there.name, "Groceries");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_can_rename_project(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Original").await;

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        alice,
        &UpdateProject {
            name: "Updated".to_string(),
        },
    )
    .await
    .unwrap()
    .expect("owner update should succeed");
    assert_eq!(updated.name, "Updated");
    assert_eq!(updated.owner_id, alice);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_has_empty_named_project(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;

    assert!(!ProjectRepo::has_empty_named(&pool, alice).await.unwrap());
    new_project(&pool, alice, "").await;
    assert!(ProjectRepo::has_empty_named(&pool, alice).await.unwrap());
    assert!(!ProjectRepo::has_empty_named(&pool, bob).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_project_cascades_to_tasks(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let milk = new_task(&pool, alice, project.id, "Buy milk").await;
    let eggs = new_task(&pool, alice, project.id, "Buy eggs").await;

    assert!(ProjectRepo::delete(&pool, project.id, alice).await.unwrap());

    for id in [milk.id, eggs.id] {
        assert!(TaskRepo::find_owned(&pool, id, alice).await.unwrap().is_none());
    }
    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_task_defaults(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;

    let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
    assert_eq!(task.content, "Buy milk");
    assert_eq!(task.priority, 0);
    assert!(!task.completed);
    assert_eq!(task.deadline, tomorrow);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_task_in_foreign_project_inserts_nothing(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;

    let result = TaskRepo::create(
        &pool,
        bob,
        &CreateTask {
            project_id: project.id,
            content: "Sneaky".to_string(),
            deadline: Utc::now().date_naive(),
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
    assert!(TaskRepo::list_by_project(&pool, project.id, alice)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_task_access_is_scoped_transitively(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;

    assert!(TaskRepo::find_owned(&pool, task.id, bob).await.unwrap().is_none());
    assert!(TaskRepo::list_by_project(&pool, project.id, bob).await.unwrap().is_empty());
    assert!(TaskRepo::toggle_completed(&pool, task.id, bob).await.unwrap().is_none());
    assert!(TaskRepo::adjust_priority(&pool, task.id, bob, 1).await.unwrap().is_none());
    let edit = UpdateTask {
        content: "Hijacked".to_string(),
        deadline: None,
    };
    assert!(TaskRepo::update(&pool, task.id, bob, &edit).await.unwrap().is_none());
    assert!(!TaskRepo::delete(&pool, task.id, bob).await.unwrap());

    let unchanged = TaskRepo::find_owned(&pool, task.id, alice).await.unwrap().unwrap();
    assert_eq!(unchanged.content, "Buy milk");
    assert_eq!(unchanged.priority, 0);
    assert!(!unchanged.completed);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_task_keeps_deadline_when_omitted(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;

    let updated = TaskRepo::update(
        &pool,
        task.id,
        alice,
        &UpdateTask {
            content: "Buy oat milk".to_string(),
            deadline: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.content, "Buy oat milk");
    assert_eq!(updated.deadline, task.deadline);

    let new_deadline = task.deadline.checked_add_days(Days::new(7)).unwrap();
    let moved = TaskRepo::update(
        &pool,
        task.id,
        alice,
        &UpdateTask {
            content: "Buy oat milk".to_string(),
            deadline: Some(new_deadline),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.deadline, new_deadline);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_toggle_twice_restores_state(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;
    let original = task.status();

    let once = TaskRepo::toggle_completed(&pool, task.id, alice).await.unwrap().unwrap();
    assert_eq!(once.status(), original.toggle());

    let twice = TaskRepo::toggle_completed(&pool, task.id, alice).await.unwrap().unwrap();
    assert_eq!(twice.status(), original);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_adjust_priority_respects_bounds(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;

    // Below the floor.
    assert!(TaskRepo::adjust_priority(&pool, task.id, alice, -1).await.unwrap().is_none());

    for expected in 1..=MAX_PRIORITY {
        let adjusted = TaskRepo::adjust_priority(&pool, task.id, alice, 1)
            .await
            .unwrap()
            .expect("increment within bounds should succeed");
        assert_eq!(adjusted.priority, expected);
    }

    // Above the ceiling.
    assert!(TaskRepo::adjust_priority(&pool, task.id, alice, 1).await.unwrap().is_none());
    let stored = TaskRepo::find_owned(&pool, task.id, alice).await.unwrap().unwrap();
    assert_eq!(stored.priority, MAX_PRIORITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_increments_never_exceed_maximum(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let task = new_task(&pool, alice, project.id, "Buy milk").await;

    let handles: Vec<_> = (0..(MAX_PRIORITY + 5))
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { TaskRepo::adjust_priority(&pool, task.id, alice, 1).await })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            applied += 1;
        }
    }

    assert_eq!(applied, MAX_PRIORITY - MIN_PRIORITY);
    let stored = TaskRepo::find_owned(&pool, task.id, alice).await.unwrap().unwrap();
    assert_eq!(stored.priority, MAX_PRIORITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tasks_are_listed_by_descending_priority(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let project = new_project(&pool, alice, "Groceries").await;
    let low = new_task(&pool, alice, project.id, "low").await;
    let high = new_task(&pool, alice, project.id, "high").await;
    let mid = new_task(&pool, alice, project.id, "mid").await;
    set_priority(&pool, high.id, 9).await;
    set_priority(&pool, mid.id, 4).await;

    let listed = TaskRepo::list_by_project(&pool, project.id, alice).await.unwrap();
    let ids: Vec<DbId> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![high.id, mid.id, low.id]);
    assert!(listed.windows(2).all(|w| w[0].priority >= w[1].priority));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_group_projects_with_tasks(pool: PgPool) {
    let alice = new_user(&pool, "alice@example.com").await;
    let groceries = new_project(&pool, alice, "Groceries").await;
    let empty = new_project(&pool, alice, "Empty").await;
    let milk = new_task(&pool, alice, groceries.id, "Buy milk").await;
    let bread = new_task(&pool, alice, groceries.id, "Buy bread").await;
    set_priority(&pool, bread.id, 3).await;

    let projects = ProjectRepo::list_by_owner(&pool, alice).await.unwrap();
    let tasks = TaskRepo::list_by_owner(&pool, alice).await.unwrap();
    let grouped = ProjectWithTasks::group(projects, tasks);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].project.id, groceries.id);
    let ids: Vec<DbId> = grouped[0].tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![bread.id, milk.id]);
    assert_eq!(grouped[1].project.id, empty.id);
    assert_matches!(grouped[1].tasks.as_slice(), []);
}
