//! Integration tests for whole-graph loads and batch saves.
//!
//! Covers:
//! - Upsert of new and existing tasks/edges in one transaction
//! - Idempotence of repeated saves
//! - Columns preserved on conflict (`position`, `created_at`)
//! - Rejection of ids owned by another project, with nothing written
//! - Rejection of parent links and edges that reach into another project
//! - Deferred foreign keys (child before parent, dangling edges)

use amaxa_core::task_graph::{Position, TaskPriority, TaskStatus};
use amaxa_db::models::edge::EdgeInput;
use amaxa_db::models::graph::{GraphSaveOutcome, TaskUpsert};
use amaxa_db::models::user::CreateUser;
use amaxa_db::repositories::{GraphRepo, ProjectRepo, TaskRepo, UserRepo};
use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool) {
    UserRepo::create(
        pool,
        &CreateUser {
            id: "u1".to_string(),
            name: Some("Ann".to_string()),
            email: "ann@example.com".to_string(),
            image: None,
            role: None,
        },
    )
    .await
    .unwrap();
    ProjectRepo::create(pool, "p1", "Robotics").await.unwrap();
    ProjectRepo::create(pool, "p2", "Garden").await.unwrap();
}

fn task(id: &str, project_id: &str, title: &str) -> TaskUpsert {
    TaskUpsert {
        id: id.to_string(),
        project_id: project_id.to_string(),
        task_type: "task".to_string(),
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::Todo,
        priority: TaskPriority::Low,
        label: None,
        position: Position::new(0.0, 0.0),
        assignee_id: Some("u1".to_string()),
        parent_id: None,
        done_by: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
    }
}

fn edge(id: &str, project_id: &str, source: &str, target: &str) -> EdgeInput {
    EdgeInput {
        id: id.to_string(),
        project_id: project_id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}

async fn edge_count(pool: &PgPool) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM edges")
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_unknown_project_returns_none(pool: PgPool) {
    assert!(GraphRepo::load(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_empty_project(pool: PgPool) {
    seed(&pool).await;
    let graph = GraphRepo::load(&pool, "p1").await.unwrap().unwrap();
    assert!(graph.tasks.is_empty());
    assert!(graph.edges.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_shapes_tasks_as_nodes(pool: PgPool) {
    seed(&pool).await;
    let mut child = task("t2", "p1", "Build");
    child.parent_id = Some("t1".to_string());
    child.position = Position::new(40.0, 80.0);
    let tasks = [task("t1", "p1", "Design"), child];
    GraphRepo::save(&pool, "p1", &tasks, &[edge("e1", "p1", "t1", "t2")])
        .await
        .unwrap();

    let graph = GraphRepo::load(&pool, "p1").await.unwrap().unwrap();
    assert_eq!(graph.tasks.len(), 2);
    assert_eq!(graph.edges.len(), 1);

    let node = graph.tasks.iter().find(|n| n.id == "t2").unwrap();
    assert_eq!(node.parent_id.as_deref(), Some("t1"));
    assert_eq!(node.position, Position::new(40.0, 80.0));
    assert_eq!(node.data.id.as_deref(), Some("t2"));
    assert_eq!(node.data.parent.as_ref().map(|p| p.id.as_str()), Some("t1"));
    assert_eq!(node.data.assignee_name.as_deref(), Some("Ann"));
    assert_eq!(node.data.assignee.as_ref().unwrap().id, "u1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_excludes_other_projects(pool: PgPool) {
    seed(&pool).await;
    GraphRepo::save(&pool, "p1", &[task("t1", "p1", "A")], &[])
        .await
        .unwrap();
    GraphRepo::save(&pool, "p2", &[task("t2", "p2", "B")], &[])
        .await
        .unwrap();

    let graph = GraphRepo::load(&pool, "p2").await.unwrap().unwrap();
    let ids: Vec<&str> = graph.tasks.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["t2"]);
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_inserts_then_updates(pool: PgPool) {
    seed(&pool).await;
    let outcome = GraphRepo::save(&pool, "p1", &[task("t1", "p1", "Design")], &[])
        .await
        .unwrap();
    assert_eq!(outcome, GraphSaveOutcome::Saved { tasks: 1, edges: 0 });

    let mut changed = task("t1", "p1", "Design v2");
    changed.status = TaskStatus::Done;
    changed.priority = TaskPriority::High;
    changed.label = Some("ui".to_string());
    GraphRepo::save(&pool, "p1", &[changed], &[]).await.unwrap();

    let stored = TaskRepo::find_by_id(&pool, "t1").await.unwrap().unwrap();
    assert_eq!(stored.title, "Design v2");
    assert_eq!(stored.status, TaskStatus::Done);
    assert_eq!(stored.priority, TaskPriority::High);
    assert_eq!(stored.label.as_deref(), Some("ui"));
    assert_eq!(TaskRepo::count_by_project(&pool, "p1").await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_is_idempotent(pool: PgPool) {
    seed(&pool).await;
    let tasks = [task("t1", "p1", "A"), task("t2", "p1", "B")];
    let edges = [edge("e1", "p1", "t1", "t2")];

    GraphRepo::save(&pool, "p1", &tasks, &edges).await.unwrap();
    let first = GraphRepo::load(&pool, "p1").await.unwrap().unwrap();
    GraphRepo::save(&pool, "p1", &tasks, &edges).await.unwrap();
    let second = GraphRepo::load(&pool, "p1").await.unwrap().unwrap();

    assert_eq!(first.edges, second.edges);
    assert_eq!(
        serde_json::to_value(&first.tasks).unwrap(),
        serde_json::to_value(&second.tasks).unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_preserves_position_and_created_at(pool: PgPool) {
    seed(&pool).await;
    let mut original = task("t1", "p1", "A");
    original.position = Position::new(5.0, 6.0);
    GraphRepo::save(&pool, "p1", &[original], &[]).await.unwrap();
    let before = TaskRepo::find_by_id(&pool, "t1").await.unwrap().unwrap();

    let mut moved = task("t1", "p1", "A");
    moved.position = Position::new(900.0, 900.0);
    GraphRepo::save(&pool, "p1", &[moved], &[]).await.unwrap();
    let after = TaskRepo::find_by_id(&pool, "t1").await.unwrap().unwrap();

    assert_eq!(after.position(), Position::new(5.0, 6.0));
    assert_eq!(after.created_at, before.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_rewires_existing_edge(pool: PgPool) {
    seed(&pool).await;
    let tasks = [task("t1", "p1", "A"), task("t2", "p1", "B"), task("t3", "p1", "C")];
    GraphRepo::save(&pool, "p1", &tasks, &[edge("e1", "p1", "t1", "t2")])
        .await
        .unwrap();
    GraphRepo::save(&pool, "p1", &[], &[edge("e1", "p1", "t2", "t3")])
        .await
        .unwrap();

    let graph = GraphRepo::load(&pool, "p1").await.unwrap().unwrap();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].source, "t2");
    assert_eq!(graph.edges[0].target, "t3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_accepts_child_before_parent(pool: PgPool) {
    seed(&pool).await;
    let mut child = task("t2", "p1", "Child");
    child.parent_id = Some("t1".to_string());
    let outcome = GraphRepo::save(&pool, "p1", &[child, task("t1", "p1", "Parent")], &[])
        .await
        .unwrap();
    assert_eq!(outcome, GraphSaveOutcome::Saved { tasks: 2, edges: 0 });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_rejects_task_owned_by_other_project(pool: PgPool) {
    seed(&pool).await;
    GraphRepo::save(&pool, "p2", &[task("shared", "p2", "Theirs")], &[])
        .await
        .unwrap();

    let tasks = [task("t1", "p1", "Mine"), task("shared", "p1", "Hijack")];
    let outcome = GraphRepo::save(&pool, "p1", &tasks, &[]).await.unwrap();
    assert_eq!(outcome, GraphSaveOutcome::ForeignIds { entity: "Task" });

    let theirs = TaskRepo::find_by_id(&pool, "shared").await.unwrap().unwrap();
    assert_eq!(theirs.project_id, "p2");
    assert_eq!(theirs.title, "Theirs");
    assert!(TaskRepo::find_by_id(&pool, "t1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_rejects_edge_owned_by_other_project_and_rolls_back_tasks(pool: PgPool) {
    seed(&pool).await;
    let p2_tasks = [task("a", "p2", "A"), task("b", "p2", "B")];
    GraphRepo::save(&pool, "p2", &p2_tasks, &[edge("e1", "p2", "a", "b")])
        .await
        .unwrap();

    let tasks = [task("t1", "p1", "X"), task("t2", "p1", "Y")];
    let outcome = GraphRepo::save(&pool, "p1", &tasks, &[edge("e1", "p1", "t1", "t2")])
        .await
        .unwrap();
    assert_eq!(outcome, GraphSaveOutcome::ForeignIds { entity: "Edge" });
    assert_eq!(TaskRepo::count_by_project(&pool, "p1").await.unwrap(), 0);
    assert_eq!(edge_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_rejects_edge_to_other_projects_task(pool: PgPool) {
    seed(&pool).await;
    GraphRepo::save(&pool, "p2", &[task("foreign", "p2", "F")], &[])
        .await
        .unwrap();

    let outcome = GraphRepo::save(
        &pool,
        "p1",
        &[task("t1", "p1", "X")],
        &[edge("e1", "p1", "t1", "foreign")],
    )
    .await
    .unwrap();
    assert_matches!(outcome, GraphSaveOutcome::ForeignIds { .. });
    assert_eq!(edge_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_rejects_parent_in_other_project(pool: PgPool) {
    seed(&pool).await;
    GraphRepo::save(&pool, "p2", &[task("foreign", "p2", "F")], &[])
        .await
        .unwrap();

    let mut child = task("t1", "p1", "Child");
    child.parent_id = Some("foreign".to_string());
    let outcome = GraphRepo::save(&pool, "p1", &[task("t0", "p1", "Sibling"), child], &[])
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GraphSaveOutcome::ForeignIds {
            entity: "Task parent"
        }
    );
    assert_eq!(TaskRepo::count_by_project(&pool, "p1").await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_with_dangling_edge_fails_and_writes_nothing(pool: PgPool) {
    seed(&pool).await;
    let result = GraphRepo::save(
        &pool,
        "p1",
        &[task("t1", "p1", "X")],
        &[edge("e1", "p1", "t1", "ghost")],
    )
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
    assert_eq!(TaskRepo::count_by_project(&pool, "p1").await.unwrap(), 0);
    assert_eq!(edge_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_save_is_a_no_op(pool: PgPool) {
    seed(&pool).await;
    let outcome = GraphRepo::save(&pool, "p1", &[], &[]).await.unwrap();
    assert_eq!(outcome, GraphSaveOutcome::Saved { tasks: 0, edges: 0 });
}
