//! Workspace aggregate root.

use super::{InviteCode, Member, Role, WorkspaceDomainError, WorkspaceId};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Workspace aggregate root.
///
/// The member list keeps join order; the first entry is always the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    owner_id: UserId,
    members: Vec<Member>,
    invite_code: InviteCode,
    project_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a workspace owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        owner: UserId,
        invite_code: InviteCode,
        clock: &impl Clock,
    ) -> Result<Self, WorkspaceDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkspaceDomainError::EmptyName);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: WorkspaceId::new(),
            name: trimmed.to_owned(),
            owner_id: owner.clone(),
            members: vec![Member {
                user_id: owner,
                role: Role::Owner,
                joined_at: timestamp,
            }],
            invite_code,
            project_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Returns members in join order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns member identifiers in join order.
    pub fn member_ids(&self) -> impl Iterator<Item = &UserId> {
        self.members.iter().map(|member| &member.user_id)
    }

    /// Returns the invite code.
    #[must_use]
    pub const fn invite_code(&self) -> &InviteCode {
        &self.invite_code
    }

    /// Returns the number of projects created in this workspace.
    #[must_use]
    pub const fn project_count(&self) -> u32 {
        self.project_count
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the role `user_id` holds, or `None` for non-members.
    #[must_use]
    pub fn role_of(&self, user_id: &UserId) -> Option<Role> {
        self.members
            .iter()
            .find(|member| &member.user_id == user_id)
            .map(|member| member.role)
    }

    /// Returns the role of `user_id`, failing for non-members.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NotAMember`] when the user does not
    /// belong to the workspace.
    pub fn require_member(&self, user_id: &UserId) -> Result<Role, WorkspaceDomainError> {
        self.role_of(user_id)
            .ok_or_else(|| WorkspaceDomainError::NotAMember {
                workspace_id: self.id,
                user_id: user_id.clone(),
            })
    }

    /// Ensures `user_id` is an owner or admin.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::NotAMember`] for non-members and
    /// [`WorkspaceDomainError::InsufficientRole`] for regular members.
    pub fn require_admin(&self, user_id: &UserId) -> Result<Role, WorkspaceDomainError> {
        let role = self.require_member(user_id)?;
        if !role.is_admin() {
            return Err(self.insufficient(user_id, Role::Admin));
        }
        Ok(role)
    }

    /// Adds a user with the `member` role.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::AlreadyMember`] when the user already
    /// belongs to the workspace.
    pub fn add_member(
        &mut self,
        user_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        if self.role_of(&user_id).is_some() {
            return Err(WorkspaceDomainError::AlreadyMember {
                workspace_id: self.id,
                user_id,
            });
        }
        let timestamp = clock.utc();
        self.members.push(Member {
            user_id,
            role: Role::Member,
            joined_at: timestamp,
        });
        self.updated_at = timestamp;
        Ok(())
    }

    /// Changes a member's role. Only the owner may do this, and ownership
    /// itself is never transferred.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InsufficientRole`] when `acting` is not
    /// the owner, [`WorkspaceDomainError::OwnerImmutable`] when the change
    /// touches the owner role, or [`WorkspaceDomainError::MemberNotFound`].
    pub fn change_role(
        &mut self,
        acting: &UserId,
        target: &UserId,
        role: Role,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        if self.require_member(acting)? != Role::Owner {
            return Err(self.insufficient(acting, Role::Owner));
        }
        if role == Role::Owner || target == &self.owner_id {
            return Err(WorkspaceDomainError::OwnerImmutable(self.id));
        }
        let workspace_id = self.id;
        let member = self
            .members
            .iter_mut()
            .find(|member| &member.user_id == target)
            .ok_or_else(|| WorkspaceDomainError::MemberNotFound {
                workspace_id,
                user_id: target.clone(),
            })?;
        member.role = role;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Removes a member. Admins may remove regular members; removing an
    /// admin requires the owner.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::OwnerImmutable`] when targeting the
    /// owner, role errors for insufficient privileges, or
    /// [`WorkspaceDomainError::MemberNotFound`].
    pub fn remove_member(
        &mut self,
        acting: &UserId,
        target: &UserId,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        let acting_role = self.require_admin(acting)?;
        if target == &self.owner_id {
            return Err(WorkspaceDomainError::OwnerImmutable(self.id));
        }
        let target_role =
            self.role_of(target)
                .ok_or_else(|| WorkspaceDomainError::MemberNotFound {
                    workspace_id: self.id,
                    user_id: target.clone(),
                })?;
        if target_role == Role::Admin && acting_role != Role::Owner {
            return Err(self.insufficient(acting, Role::Owner));
        }
        self.members.retain(|member| &member.user_id != target);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Records that a project was created in this workspace.
    pub fn record_project_created(&mut self, clock: &impl Clock) {
        self.project_count = self.project_count.saturating_add(1);
        self.updated_at = clock.utc();
    }

    fn insufficient(&self, user_id: &UserId, required: Role) -> WorkspaceDomainError {
        WorkspaceDomainError::InsufficientRole {
            workspace_id: self.id,
            user_id: user_id.clone(),
            required,
        }
    }
}
