//! Merchant Center team invitations.
//!
//! Inviting someone takes three calls:
//!
//! 1. `myProjects` on the administration service, to find the organization
//!    owning the configured project and the configured team in it
//! 2. `invitation(where: ...)` on the MC backend, an advisory email check
//! 3. the `invite` mutation

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use sellertools_core::{OrganizationId, TeamId};

use super::{GraphQLTarget, MerchantCenterClient, MerchantCenterError};

const MY_PROJECTS_QUERY: &str = r"
    query ProjectInfo {
        myProjects(limit: 500) {
            results {
                key
                owner {
                    id
                    name
                    version
                    teams {
                        id
                        name
                    }
                }
            }
        }
    }
";

const HAS_VALID_EMAIL_QUERY: &str = r"
    query HasValidEmail($email: String!, $organizationId: ID!, $teamId: ID!) {
        invitation(where: { email: $email, organizationId: $organizationId, teamId: $teamId }) {
            hasValidEmail
        }
    }
";

const INVITE_MUTATION: &str = r"
    mutation Invite($draft: InvitationInput!) {
        invite(draft: $draft) {
            status
            email
        }
    }
";

/// Errors that can occur while inviting someone to the Merchant Center.
#[derive(Debug, Error)]
pub enum InvitationError {
    /// A required setting is absent.
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The configured project is not among the caller's projects.
    #[error("Project with key \"{project_key}\" not found in user projects")]
    ProjectNotFound {
        project_key: String,
        available: Vec<String>,
    },

    /// The owning organization has no team with the configured name.
    #[error("Team with name \"{0}\" not found in the project's organization")]
    TeamNotFound(String),

    /// The invite mutation returned no status.
    #[error("Invitation failed - no status returned")]
    NoStatus,

    /// Underlying API failure.
    #[error(transparent)]
    MerchantCenter(#[from] MerchantCenterError),
}

/// A project visible to the caller, with its owning organization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSummary {
    pub key: String,
    pub owner: OrganizationSummary,
}

/// Organization that owns a project.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationSummary {
    pub id: OrganizationId,
    pub name: String,
    pub version: i64,
    #[serde(default)]
    pub teams: Vec<TeamSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
}

/// Organization and team an invitation is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationTarget {
    pub organization_id: OrganizationId,
    pub organization_name: String,
    /// Current organization version; the invite is rejected if stale.
    pub organization_version: i64,
    pub team_id: TeamId,
}

/// Result of a successful `invite` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvitationReceipt {
    pub status: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvitationDraft<'a> {
    emails: [&'a str; 1],
    organization: OrganizationRef<'a>,
    team: TeamRef<'a>,
}

#[derive(Debug, Serialize)]
struct OrganizationRef<'a> {
    id: &'a str,
    version: i64,
}

#[derive(Debug, Serialize)]
struct TeamRef<'a> {
    id: &'a str,
}

/// Pick the organization and team to invite into.
///
/// The project is matched by key, the team by exact name within the
/// project's owning organization.
///
/// # Errors
///
/// Returns `InvitationError::ProjectNotFound` or `InvitationError::TeamNotFound`.
pub fn select_target(
    projects: &[ProjectSummary],
    project_key: &str,
    team_name: &str,
) -> Result<InvitationTarget, InvitationError> {
    let project = projects
        .iter()
        .find(|p| p.key == project_key)
        .ok_or_else(|| InvitationError::ProjectNotFound {
            project_key: project_key.to_string(),
            available: projects.iter().map(|p| p.key.clone()).collect(),
        })?;

    let team = project
        .owner
        .teams
        .iter()
        .find(|t| t.name == team_name)
        .ok_or_else(|| InvitationError::TeamNotFound(team_name.to_string()))?;

    Ok(InvitationTarget {
        organization_id: project.owner.id.clone(),
        organization_name: project.owner.name.clone(),
        organization_version: project.owner.version,
        team_id: team.id.clone(),
    })
}

impl MerchantCenterClient {
    /// List the caller's projects with their owning organizations.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    #[instrument(skip(self))]
    pub async fn my_projects(&self) -> Result<Vec<ProjectSummary>, MerchantCenterError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            my_projects: Results,
        }

        #[derive(Deserialize)]
        struct Results {
            results: Vec<ProjectSummary>,
        }

        let response: Response = self
            .execute(GraphQLTarget::Administration, MY_PROJECTS_QUERY, None)
            .await?;
        Ok(response.my_projects.results)
    }

    /// Ask the MC backend whether the email can be invited into the team.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    #[instrument(skip(self, target), fields(team_id = %target.team_id))]
    pub async fn has_valid_email(
        &self,
        email: &str,
        target: &InvitationTarget,
    ) -> Result<bool, MerchantCenterError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            invitation: Option<Validation>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Validation {
            #[serde(default)]
            has_valid_email: bool,
        }

        let variables = serde_json::json!({
            "email": email,
            "organizationId": target.organization_id,
            "teamId": target.team_id,
        });

        let response: Response = self
            .execute(
                GraphQLTarget::MerchantCenter,
                HAS_VALID_EMAIL_QUERY,
                Some(variables),
            )
            .await?;
        Ok(response.invitation.is_some_and(|v| v.has_valid_email))
    }

    /// Send the `invite` mutation.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError::NoStatus` if the response carries no status.
    #[instrument(skip(self, target), fields(team_id = %target.team_id))]
    pub async fn send_invitation(
        &self,
        email: &str,
        target: &InvitationTarget,
    ) -> Result<InvitationReceipt, InvitationError> {
        #[derive(Deserialize)]
        struct Response {
            invite: Option<InviteResult>,
        }

        #[derive(Deserialize)]
        struct InviteResult {
            status: Option<String>,
            email: Option<String>,
        }

        let draft = InvitationDraft {
            emails: [email],
            organization: OrganizationRef {
                id: target.organization_id.as_str(),
                version: target.organization_version,
            },
            team: TeamRef {
                id: target.team_id.as_str(),
            },
        };
        let variables = serde_json::json!({ "draft": draft });

        let response: Response = self
            .execute(
                GraphQLTarget::MerchantCenter,
                INVITE_MUTATION,
                Some(variables),
            )
            .await?;

        let invite = response.invite.ok_or(InvitationError::NoStatus)?;
        match invite.status {
            Some(status) if !status.is_empty() => Ok(InvitationReceipt {
                status,
                email: invite.email.unwrap_or_else(|| email.to_string()),
            }),
            _ => Err(InvitationError::NoStatus),
        }
    }

    /// Invite `email` into the team named `team_name` of this client's project.
    ///
    /// A negative email check is logged and the invitation is sent anyway.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError::MissingConfig` if no team name or access
    /// token is configured, or any error from the individual calls.
    #[instrument(skip(self, team_name))]
    pub async fn invite(
        &self,
        email: &str,
        team_name: Option<&str>,
    ) -> Result<InvitationReceipt, InvitationError> {
        let team_name = team_name
            .filter(|t| !t.trim().is_empty())
            .ok_or(InvitationError::MissingConfig("MC_TEAM_NAME"))?;
        if self.project_key().is_empty() {
            return Err(InvitationError::MissingConfig("CTP_PROJECT_KEY"));
        }
        if !self.has_access_token() {
            return Err(InvitationError::MissingConfig("MC_ACCESS_TOKEN"));
        }

        let projects = self.my_projects().await?;
        tracing::debug!(count = projects.len(), "Fetched Merchant Center projects");

        let target = select_target(&projects, self.project_key(), team_name)?;
        tracing::debug!(
            organization_id = %target.organization_id,
            organization = %target.organization_name,
            team_id = %target.team_id,
            "Resolved invitation target"
        );

        if !self.has_valid_email(email, &target).await? {
            tracing::warn!(email = %email, "Email validation failed, sending invitation anyway");
        }

        let receipt = self.send_invitation(email, &target).await?;
        tracing::info!(
            email = %receipt.email,
            status = %receipt.status,
            "Merchant Center invitation sent"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::super::client::tests::test_client;
    use super::*;

    fn projects() -> Vec<ProjectSummary> {
        serde_json::from_value(json!([
            {
                "key": "other",
                "owner": {"id": "org-2", "name": "Other", "version": 3, "teams": []}
            },
            {
                "key": "demo",
                "owner": {
                    "id": "org-1",
                    "name": "Acme Holdings",
                    "version": 247,
                    "teams": [
                        {"id": "team-admins", "name": "Administrators"},
                        {"id": "team-sellers", "name": "Sellers"}
                    ]
                }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_select_target() {
        let target = select_target(&projects(), "demo", "Sellers").unwrap();
        assert_eq!(target.organization_id.as_str(), "org-1");
        assert_eq!(target.organization_version, 247);
        assert_eq!(target.team_id.as_str(), "team-sellers");
    }

    #[test]
    fn test_select_target_unknown_project() {
        let err = select_target(&projects(), "missing", "Sellers").unwrap_err();
        assert!(matches!(
            err,
            InvitationError::ProjectNotFound { ref available, .. }
                if available == &["other", "demo"]
        ));
    }

    #[test]
    fn test_select_target_unknown_team() {
        let err = select_target(&projects(), "demo", "sellers").unwrap_err();
        assert!(matches!(err, InvitationError::TeamNotFound(ref t) if t == "sellers"));
    }

    #[test]
    fn test_draft_shape() {
        let draft = InvitationDraft {
            emails: ["ada@acme.com"],
            organization: OrganizationRef {
                id: "org-1",
                version: 247,
            },
            team: TeamRef { id: "team-sellers" },
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "emails": ["ada@acme.com"],
                "organization": {"id": "org-1", "version": 247},
                "team": {"id": "team-sellers"}
            })
        );
    }

    async fn mock_projects(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/graphql")
            .match_header("x-graphql-target", "administration")
            .with_status(200)
            .with_body(
                json!({"data": {"myProjects": {"results": [{
                    "key": "demo",
                    "owner": {
                        "id": "org-1",
                        "name": "Acme Holdings",
                        "version": 247,
                        "teams": [{"id": "team-sellers", "name": "Sellers"}]
                    }
                }]}}})
                .to_string(),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_invite_full_flow() {
        let mut server = mockito::Server::new_async().await;
        let projects = mock_projects(&mut server).await;
        let check = server
            .mock("POST", "/graphql")
            .match_header("x-graphql-target", "mc")
            .match_body(Matcher::Regex("HasValidEmail".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"invitation":{"hasValidEmail":false}}}"#)
            .create_async()
            .await;
        let invite = server
            .mock("POST", "/graphql")
            .match_header("x-graphql-target", "mc")
            .match_body(Matcher::PartialJson(json!({
                "variables": {"draft": {
                    "emails": ["ada@acme.com"],
                    "organization": {"id": "org-1", "version": 247},
                    "team": {"id": "team-sellers"}
                }}
            })))
            .with_status(200)
            .with_body(r#"{"data":{"invite":{"status":"Pending","email":"ada@acme.com"}}}"#)
            .create_async()
            .await;

        let receipt = test_client(&server)
            .invite("ada@acme.com", Some("Sellers"))
            .await
            .unwrap();

        assert_eq!(receipt.status, "Pending");
        projects.assert_async().await;
        check.assert_async().await;
        invite.assert_async().await;
    }

    #[tokio::test]
    async fn test_invite_without_status() {
        let mut server = mockito::Server::new_async().await;
        let _projects = mock_projects(&mut server).await;
        let _check = server
            .mock("POST", "/graphql")
            .match_header("x-graphql-target", "mc")
            .match_body(Matcher::Regex("HasValidEmail".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"invitation":{"hasValidEmail":true}}}"#)
            .create_async()
            .await;
        let _invite = server
            .mock("POST", "/graphql")
            .match_header("x-graphql-target", "mc")
            .match_body(Matcher::Regex("mutation Invite".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"invite":{"status":null,"email":"ada@acme.com"}}}"#)
            .create_async()
            .await;

        let err = test_client(&server)
            .invite("ada@acme.com", Some("Sellers"))
            .await
            .unwrap_err();

        assert!(matches!(err, InvitationError::NoStatus));
    }

    #[tokio::test]
    async fn test_invite_requires_team_name() {
        let server = mockito::Server::new_async().await;
        let err = test_client(&server)
            .invite("ada@acme.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, InvitationError::MissingConfig("MC_TEAM_NAME")));
    }
}
