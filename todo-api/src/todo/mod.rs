use crate::entities::*;
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Todo {
    id: i32,
    task: String,
    completed: bool,
}

impl Todo {
    pub fn new(id: i32, task: String, completed: bool) -> Self {
        Self {
            id,
            task,
            completed,
        }
    }

    /// Returns the storage-assigned ID of the todo.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the task text.
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Returns whether the todo is completed.
    pub fn completed(&self) -> bool {
        self.completed
    }
}

impl From<todo::Model> for Todo {
    fn from(model: todo::Model) -> Self {
        Todo::new(model.id, model.task, model.completed)
    }
}

/// Partial update of a todo. Fields left as `None` keep their stored value.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Returns true when the patch would not change any field.
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.completed.is_none()
    }
}

/// Error type for TodoGateway operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// No todo is stored under the given ID.
    #[error("Todo with ID {0} not found")]
    NotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Storage operations on todos.
///
/// Handlers only see this trait, so they can be exercised against a mock
/// gateway without a database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoGateway: Send + Sync {
    /// Creates the todo table if it does not exist yet.
    async fn initialize(&self) -> Result<(), TodoServiceError>;

    /// Returns every todo in insertion order.
    async fn list_all(&self) -> Result<Vec<Todo>, TodoServiceError>;

    /// Stores a new, uncompleted todo and returns it with its assigned ID.
    async fn create(&self, task: String) -> Result<Todo, TodoServiceError>;

    /// Returns the todo with the given ID.
    async fn get(&self, id: i32) -> Result<Todo, TodoServiceError>;

    /// Applies the fields present in `patch` and returns the updated todo.
    async fn update(&self, id: i32, patch: TodoPatch) -> Result<Todo, TodoServiceError>;

    /// Removes the todo with the given ID.
    async fn delete(&self, id: i32) -> Result<(), TodoServiceError>;

    /// Runs a trivial query to check that storage is reachable.
    async fn ping(&self) -> Result<(), TodoServiceError>;
}

/// sea-orm backed implementation of [`TodoGateway`].
#[derive(Debug, Clone)]
pub struct TodoService {
    db: DatabaseConnection,
}

impl TodoService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoGateway for TodoService {
    #[tracing::instrument(skip(self))]
    async fn initialize(&self) -> Result<(), TodoServiceError> {
        Migrator::up(&self.db, None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = todo::Entity::find()
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Todo::from)
            .collect();
        Ok(todos)
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, task: String) -> Result<Todo, TodoServiceError> {
        let active_model = todo::ActiveModel {
            task: ActiveValue::Set(task),
            completed: ActiveValue::Set(false),
            ..Default::default()
        };
        let created_model = active_model.insert(&self.db).await?;
        Ok(Todo::from(created_model))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<Todo, TodoServiceError> {
        todo::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Todo::from)
            .ok_or(TodoServiceError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: i32, patch: TodoPatch) -> Result<Todo, TodoServiceError> {
        let todo_to_update = todo::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TodoServiceError::NotFound(id))?;

        if patch.is_empty() {
            return Ok(Todo::from(todo_to_update));
        }

        let mut active_model: todo::ActiveModel = todo_to_update.into();
        if let Some(task) = patch.task {
            active_model.task = ActiveValue::Set(task);
        }
        if let Some(completed) = patch.completed {
            active_model.completed = ActiveValue::Set(completed);
        }

        // The row can disappear between the lookup and the write.
        let updated_model = active_model.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => TodoServiceError::NotFound(id),
            other => TodoServiceError::Database(other),
        })?;
        Ok(Todo::from(updated_model))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), TodoServiceError> {
        let result = todo::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(TodoServiceError::NotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> Result<(), TodoServiceError> {
        self.db.execute_unprepared("SELECT 1").await?;
        Ok(())
    }
}
