use std::collections::HashSet;

use validator::Validate;

use crate::{
    entities::project::{NewProject, Project, ProjectPatch},
    errors::AppError,
    repositories::project::ProjectRepository,
    use_cases::{
        listing::{ListingParams, Page},
        slug::{duplicate_slug, slug_for_create, slug_for_update},
    },
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Filtered, sorted and paginated listing.
    pub async fn list_projects(&self, params: &ListingParams) -> Result<Page<Project>, AppError> {
        let criteria = params.project_criteria()?;
        let projects = self.project_repo.list_projects().await?;
        Ok(params.paginate(criteria.apply(projects)))
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        self.project_repo.get_project(&id).await
    }

    pub async fn create_project(&self, new: NewProject) -> Result<Project, AppError> {
        new.validate()?;
        let slug = slug_for_create(new.slug.as_deref(), &new.title)
            .ok_or_else(|| AppError::field("slug", "Slug could not be derived from the title"))?;
        self.ensure_slug_free(&slug, None).await?;

        let project = Project::from_new(new, slug);
        self.project_repo.insert_project(&project).await?;
        tracing::info!(project_id = %project.id, slug = %project.slug, "Project created");
        Ok(project)
    }

    /// Full replacement. The slug is kept unless a new one is supplied.
    pub async fn replace_project(&self, id: &str, new: NewProject) -> Result<Project, AppError> {
        new.validate()?;
        let id = valid_uuid(id)?;
        let mut project = self.project_repo.get_project(&id).await?;

        let slug = slug_for_update(new.slug.as_deref(), &project.slug);
        self.ensure_slug_free(&slug, Some(id)).await?;

        project.replace_with(new, slug);
        self.project_repo.update_project(&project).await?;
        Ok(project)
    }

    pub async fn patch_project(&self, id: &str, patch: ProjectPatch) -> Result<Project, AppError> {
        patch.validate()?;
        let id = valid_uuid(id)?;
        let mut project = self.project_repo.get_project(&id).await?;

        let slug = slug_for_update(patch.slug.as_deref(), &project.slug);
        self.ensure_slug_free(&slug, Some(id)).await?;

        project.apply_patch(patch, slug);
        self.project_repo.update_project(&project).await?;
        Ok(project)
    }

    pub async fn duplicate_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_uuid(id)?;
        let source = self.project_repo.get_project(&id).await?;

        let taken: HashSet<String> = self
            .project_repo
            .list_projects()
            .await?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        let slug = duplicate_slug(&source.slug, |candidate| taken.contains(candidate));

        let copy = source.duplicate(slug);
        self.project_repo.insert_project(&copy).await?;
        tracing::info!(source_id = %source.id, project_id = %copy.id, "Project duplicated");
        Ok(copy)
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.project_repo.delete_project(&id).await?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, exclude: Option<uuid::Uuid>) -> Result<(), AppError> {
        if self.project_repo.slug_exists(slug, exclude).await? {
            return Err(AppError::Conflict("Slug already exists".into()));
        }
        Ok(())
    }
}
