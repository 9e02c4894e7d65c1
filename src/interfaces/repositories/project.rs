use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{self, types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// All projects in insertion order.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn insert_project(&self, project: &Project) -> Result<(), AppError>;
    async fn update_project(&self, project: &Project) -> Result<(), AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

pub type DynProjectRepo = Arc<dyn ProjectRepository>;

#[async_trait]
impl<T> ProjectRepository for Arc<T>
where
    T: ProjectRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        (**self).list_projects().await
    }

    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError> {
        (**self).get_project(id).await
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        (**self).slug_exists(slug, exclude_id).await
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        (**self).insert_project(project).await
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        (**self).update_project(project).await
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_project(id).await
    }
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects ORDER BY created_at ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(project_not_found)?;

        Project::try_from(row)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM projects
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, title, slug, description, long_description, technologies, features,
                github_url, live_url, image_url, screenshots, category, status, difficulty,
                featured, stats, performance, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(&project.technologies)
        .bind(&project.features)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(&project.screenshots)
        .bind(project.category.as_str())
        .bind(project.status.as_str())
        .bind(project.difficulty.as_str())
        .bind(project.featured)
        .bind(Json(&project.stats))
        .bind(Json(&project.performance))
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = $2, slug = $3, description = $4, long_description = $5,
                technologies = $6, features = $7, github_url = $8, live_url = $9,
                image_url = $10, screenshots = $11, category = $12, status = $13,
                difficulty = $14, featured = $15, stats = $16, performance = $17,
                updated_at = $18
            WHERE id = $1
            "#
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(&project.technologies)
        .bind(&project.features)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.image_url)
        .bind(&project.screenshots)
        .bind(project.category.as_str())
        .bind(project.status.as_str())
        .bind(project.difficulty.as_str())
        .bind(project.featured)
        .bind(Json(&project.stats))
        .bind(Json(&project.performance))
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(project_not_found());
        }
        Ok(())
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(project_not_found());
        }
        Ok(())
    }
}
