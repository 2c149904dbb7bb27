//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two mutually exclusive account kinds.
///
/// The wire/storage tag uses snake case (`job_seeker`), while URL namespaces
/// use kebab case (`/job-seeker/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Recruiter,
}

impl Role {
    /// Storage and API tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Recruiter => "recruiter",
        }
    }

    /// URL namespace segment.
    pub fn path_segment(self) -> &'static str {
        match self {
            Role::JobSeeker => "job-seeker",
            Role::Recruiter => "recruiter",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Recruiter => "Recruiter",
        }
    }

    /// Path of this role's dashboard.
    pub fn dashboard_path(self) -> String {
        format!("/{}/dashboard", self.path_segment())
    }

    pub fn all() -> &'static [Role] {
        &[Role::JobSeeker, Role::Recruiter]
    }

    /// Parses a URL namespace segment (`job-seeker`, `recruiter`).
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Role::all()
            .iter()
            .copied()
            .find(|r| r.path_segment() == segment)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    /// Accepts the storage tag as well as the URL segment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "job_seeker" | "job-seeker" => Ok(Role::JobSeeker),
            "recruiter" => Ok(Role::Recruiter),
            other => anyhow::bail!("Unknown role '{other}' (expected job_seeker or recruiter)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_path_uses_url_segment() {
        assert_eq!(Role::Recruiter.dashboard_path(), "/recruiter/dashboard");
        assert_eq!(Role::JobSeeker.dashboard_path(), "/job-seeker/dashboard");
    }

    #[test]
    fn test_parse_accepts_tag_and_segment() {
        assert_eq!("job_seeker".parse::<Role>().unwrap(), Role::JobSeeker);
        assert_eq!("job-seeker".parse::<Role>().unwrap(), Role::JobSeeker);
        assert_eq!("recruiter".parse::<Role>().unwrap(), Role::Recruiter);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case_tag() {
        let json = serde_json::to_string(&Role::JobSeeker).unwrap();
        assert_eq!(json, "\"job_seeker\"");
    }
}
