//! Team catalog.
//!
//! Plain records with no authorization weight of their own: any
//! authenticated user may read, only admins may mutate. Member lists must
//! resolve to known directory users (active or not; a team may keep a
//! deactivated member for history).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crewtask_proto::team::{Team, TeamDraft, TeamId};

use crate::auth::AuthUser;
use crate::clock;
use crate::directory::UserDirectory;
use crate::error::ApiError;

/// In-memory team store plus its mutation rules.
pub struct TeamService {
    teams: RwLock<HashMap<TeamId, Team>>,
    directory: Arc<UserDirectory>,
}

impl TeamService {
    /// Creates an empty service over the user directory.
    #[must_use]
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self {
            teams: RwLock::new(HashMap::new()),
            directory,
        }
    }

    /// Creates a team. Admin only.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`] for non-admins, [`ApiError::Validation`]
    /// for an empty name or a member id unknown to the directory.
    pub async fn create(&self, requester: &AuthUser, draft: TeamDraft) -> Result<Team, ApiError> {
        requester.require_admin()?;
        let draft = self.validated(draft).await?;
        let team = Team {
            id: TeamId::new(),
            name: draft.name,
            description: draft.description,
            members: draft.members,
            created_at: clock::now_millis(),
        };
        let mut teams = self.teams.write().await;
        teams.insert(team.id, team.clone());
        tracing::info!(team_id = %team.id, user_id = %requester.id, "team created");
        Ok(team)
    }

    /// Returns one team.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: TeamId) -> Result<Team, ApiError> {
        let teams = self.teams.read().await;
        teams
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("team not found"))
    }

    /// Every team, name-sorted.
    pub async fn all(&self) -> Vec<Team> {
        let teams = self.teams.read().await;
        let mut list: Vec<Team> = teams.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Replaces a team's name, description, and members. Admin only.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`], [`ApiError::Validation`], or
    /// [`ApiError::NotFound`] as for [`Self::create`] and [`Self::get`].
    pub async fn update(
        &self,
        requester: &AuthUser,
        id: TeamId,
        draft: TeamDraft,
    ) -> Result<Team, ApiError> {
        requester.require_admin()?;
        let draft = self.validated(draft).await?;
        let mut teams = self.teams.write().await;
        let team = teams
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("team not found"))?;
        team.name = draft.name;
        team.description = draft.description;
        team.members = draft.members;
        tracing::info!(team_id = %id, user_id = %requester.id, "team updated");
        Ok(team.clone())
    }

    /// Deletes a team. Admin only. Projects linked to it keep their
    /// dangling `teamId`; links are informational.
    ///
    /// # Errors
    ///
    /// [`ApiError::Forbidden`] for non-admins, [`ApiError::NotFound`] for
    /// an unknown id.
    pub async fn delete(&self, requester: &AuthUser, id: TeamId) -> Result<(), ApiError> {
        requester.require_admin()?;
        let mut teams = self.teams.write().await;
        if teams.remove(&id).is_none() {
            return Err(ApiError::not_found("team not found"));
        }
        tracing::info!(team_id = %id, user_id = %requester.id, "team deleted");
        Ok(())
    }

    /// Returns `true` when a team with this id exists.
    pub async fn contains(&self, id: TeamId) -> bool {
        let teams = self.teams.read().await;
        teams.contains_key(&id)
    }

    async fn validated(&self, mut draft: TeamDraft) -> Result<TeamDraft, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("name is required"));
        }
        let mut seen = Vec::with_capacity(draft.members.len());
        for member in draft.members {
            if !seen.contains(&member) {
                seen.push(member);
            }
        }
        draft.members = seen;
        for member in &draft.members {
            if !self.directory.contains(member).await {
                return Err(ApiError::validation(format!(
                    "member {member} is not a known user"
                )));
            }
        }
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewtask_proto::user::{Role, User, UserId};

    async fn service() -> TeamService {
        let directory = Arc::new(UserDirectory::new());
        for id in ["u1", "u2"] {
            directory
                .upsert(User {
                    id: UserId::from(id),
                    name: id.to_owned(),
                    role: Role::User,
                    active: true,
                })
                .await;
        }
        TeamService::new(directory)
    }

    fn admin() -> AuthUser {
        AuthUser {
            id: UserId::from("admin-1"),
            role: Role::Admin,
        }
    }

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::from("u1"),
            role: Role::User,
        }
    }

    fn draft(name: &str, members: &[&str]) -> TeamDraft {
        TeamDraft {
            name: name.to_owned(),
            description: String::new(),
            members: members.iter().map(|s| UserId::from(*s)).collect(),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete_round_trip() {
        let service = service().await;
        let team = service.create(&admin(), draft("Platform", &["u1"])).await.unwrap();
        assert_eq!(service.get(team.id).await.unwrap(), team);

        let updated = service
            .update(&admin(), team.id, draft("Core Platform", &["u1", "u2"]))
            .await
            .unwrap();
        assert_eq!(updated.name, "Core Platform");
        assert_eq!(updated.members.len(), 2);
        assert_eq!(updated.created_at, team.created_at);

        service.delete(&admin(), team.id).await.unwrap();
        assert!(matches!(
            service.get(team.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn mutations_are_admin_only() {
        let service = service().await;
        assert!(matches!(
            service.create(&user(), draft("Platform", &[])).await,
            Err(ApiError::Forbidden(_))
        ));
        let team = service.create(&admin(), draft("Platform", &[])).await.unwrap();
        assert!(matches!(
            service.update(&user(), team.id, draft("X", &[])).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&user(), team.id).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn unknown_member_rejected() {
        let service = service().await;
        assert!(matches!(
            service.create(&admin(), draft("Platform", &["nobody"])).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn empty_name_rejected() {
        let service = service().await;
        assert!(matches!(
            service.create(&admin(), draft("  ", &[])).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn all_is_name_sorted() {
        let service = service().await;
        service.create(&admin(), draft("Zulu", &[])).await.unwrap();
        service.create(&admin(), draft("Alpha", &[])).await.unwrap();
        let names: Vec<String> = service.all().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Alpha", "Zulu"]);
    }
}
