use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Identity & roles ---

/// Authorization class for a signed-in user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role as the client knows it: either still being resolved or settled.
/// Guards must treat `Unknown` as "not yet", never as a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Unknown,
    Resolved(Role),
}

impl RoleState {
    pub fn resolved(self) -> Option<Role> {
        match self {
            RoleState::Resolved(r) => Some(r),
            RoleState::Unknown => None,
        }
    }
}

/// The provider-owned identity mirrored into the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Token bundle issued by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Identity,
}

impl SessionTokens {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Durable user-facing attributes, one per identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub department: Option<String>,
    pub batch: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// --- Drives ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    Upcoming,
    Ongoing,
    Completed,
    Closed,
}

impl DriveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriveStatus::Upcoming => "upcoming",
            DriveStatus::Ongoing => "ongoing",
            DriveStatus::Completed => "completed",
            DriveStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<DriveStatus> {
        match s {
            "upcoming" => Some(DriveStatus::Upcoming),
            "ongoing" => Some(DriveStatus::Ongoing),
            "completed" => Some(DriveStatus::Completed),
            "closed" => Some(DriveStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub cgpa: String,
    pub branches: Vec<String>,
    pub backlogs_allowed: u32,
    pub class_requirement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStep {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// A recruiting drive run by a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Advertised job title, e.g. "Software Engineer".
    pub role_title: String,
    /// Compensation as the company quotes it, e.g. "12 LPA".
    pub ctc: String,
    pub drive_date: String,
    pub status: DriveStatus,
    pub description: Option<String>,
    pub eligibility: Option<Eligibility>,
    pub selection_process: Vec<SelectionStep>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived: number of students registered for this drive.
    pub registration_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriveRequest {
    pub name: String,
    pub location: String,
    pub role_title: String,
    pub ctc: String,
    pub drive_date: String,
    pub status: DriveStatus,
    pub description: Option<String>,
    pub eligibility: Option<Eligibility>,
    pub selection_process: Vec<SelectionStep>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriveRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub role_title: Option<String>,
    pub ctc: Option<String>,
    pub drive_date: Option<String>,
    pub status: Option<DriveStatus>,
    pub description: Option<String>,
    pub eligibility: Option<Eligibility>,
    pub selection_process: Option<Vec<SelectionStep>>,
}

// --- Registrations ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Registered,
    Applied,
    Shortlisted,
    Interviewing,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Registered => "registered",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<ApplicationStatus> {
        match s {
            "registered" => Some(ApplicationStatus::Registered),
            "applied" => Some(ApplicationStatus::Applied),
            "shortlisted" => Some(ApplicationStatus::Shortlisted),
            "interviewing" => Some(ApplicationStatus::Interviewing),
            "selected" => Some(ApplicationStatus::Selected),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// A student's enrollment in a drive, unique per (user, company) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration joined with the student's profile and the drive, for the
/// admin overview table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    #[serde(flatten)]
    pub registration: Registration,
    pub student_name: String,
    pub student_email: String,
    pub department: Option<String>,
    pub batch: Option<String>,
    pub company_name: String,
    pub company_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationStatusRequest {
    pub status: ApplicationStatus,
}

// --- Discussion ---

/// A discussion post under a drive, enriched with author details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveMessage {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    pub content: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PinMessageRequest {
    pub pinned: bool,
}

// --- Auth wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub department: Option<String>,
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub batch: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginUrl {
    pub url: String,
}

// --- Realtime change feed ---

/// Backend tables the client can watch for changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WatchedTable {
    Companies,
    Registrations,
    Messages,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsEnvelope<T> {
    pub id: String,
    #[serde(flatten)]
    pub payload: T,
    pub ts: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    Subscribe {
        table: WatchedTable,
        company_id: Option<String>,
    },
    Unsubscribe {
        table: WatchedTable,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A row in `table` was inserted/updated/deleted by some client or by
    /// the backend directly.
    Change {
        table: WatchedTable,
        op: ChangeOp,
        company_id: Option<String>,
    },
    Ack {
        nonce: String,
    },
    Error {
        code: String,
        message: String,
    },
}
