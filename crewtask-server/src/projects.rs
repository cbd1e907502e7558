//! Project catalog.
//!
//! Same shape as teams: any authenticated user may read, only admins may
//! mutate. A project may link to a team; the link must reference an
//! existing team at write time.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crewtask_proto::project::{Project, ProjectDraft, ProjectId, ProjectStatus};

use crate::auth::AuthUser;
use crate::clock;
use crate::error::ApiError;
use crate::teams::TeamService;

/// In-memory project store plus its mutation rules.
pub struct ProjectService {
    projects: RwLock<HashMap<ProjectId, Project>>,
    teams: Arc<TeamService>,
}

impl ProjectService {
    /// Creates an empty service over the team catalog.
    #[must_use]
    pub fn new(teams: Arc<TeamService>) -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
            teams,
        }
    }

    /// Creates a project. Admin only. Status defaults to `active`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`] for non-admins, [`ApiError::Validation`]
    /// for an empty name or a `teamId` that does not resolve.
    pub async fn create(
        &self,
        requester: &AuthUser,
        draft: ProjectDraft,
    ) -> Result<Project, ApiError> {
        requester.require_admin()?;
        self.validate(&draft).await?;
        let project = Project {
            id: ProjectId::new(),
            name: draft.name,
            description: draft.description,
            team_id: draft.team_id,
            status: draft.status.unwrap_or(ProjectStatus::Active),
            created_at: clock::now_millis(),
        };
        let mut projects = self.projects.write().await;
        projects.insert(project.id, project.clone());
        tracing::info!(project_id = %project.id, user_id = %requester.id, "project created");
        Ok(project)
    }

    /// Returns one project.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: ProjectId) -> Result<Project, ApiError> {
        let projects = self.projects.read().await;
        projects
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("project not found"))
    }

    /// Every project, name-sorted.
    pub async fn all(&self) -> Vec<Project> {
        let projects = self.projects.read().await;
        let mut list: Vec<Project> = projects.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Replaces a project's fields. Admin only. An omitted status keeps the
    /// stored one.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`], [`ApiError::Validation`], or
    /// [`ApiError::NotFound`] as for [`Self::create`] and [`Self::get`].
    pub async fn update(
        &self,
        requester: &AuthUser,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, ApiError> {
        requester.require_admin()?;
        self.validate(&draft).await?;
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("project not found"))?;
        project.name = draft.name;
        project.description = draft.description;
        project.team_id = draft.team_id;
        if let Some(status) = draft.status {
            project.status = status;
        }
        tracing::info!(project_id = %id, user_id = %requester.id, "project updated");
        Ok(project.clone())
    }

    /// Deletes a project. Admin only.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`] for non-admins, [`ApiError::NotFound`] for
    /// an unknown id.
    pub async fn delete(&self, requester: &AuthUser, id: ProjectId) -> Result<(), ApiError> {
        requester.require_admin()?;
        let mut projects = self.projects.write().await;
        if projects.remove(&id).is_none() {
            return Err(ApiError::not_found("project not found"));
        }
        tracing::info!(project_id = %id, user_id = %requester.id, "project deleted");
        Ok(())
    }

    async fn validate(&self, draft: &ProjectDraft) -> Result<(), ApiError> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("name is required"));
        }
        if let Some(team_id) = draft.team_id
            && !self.teams.contains(team_id).await
        {
            return Err(ApiError::validation(format!(
                "team {team_id} does not exist"
            )));
        }
        Ok(())
    }
}
