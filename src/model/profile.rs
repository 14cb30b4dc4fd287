use serde::{Deserialize, Serialize};

/// Fallback reporter name when the session carries neither a full nor a display name
pub const ANONYMOUS_CITIZEN: &str = "Verified Citizen";

/// Signed-in citizen, as kept in the local session store.
///
/// Sign-in fills the identity fields; the profile form fills the contact
/// fields and flips `is_profile_complete`. Field names are serialized in
/// camelCase so sessions written by older clients still load.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CitizenProfile {
    // ========== Identity (from sign-in) ==========
    pub uid: String,
    /// Display name from the identity provider
    pub name: String,
    pub email: String,
    /// Provider avatar URL
    pub photo: String,

    // ========== Profile form ==========
    /// Compressed avatar chosen on the profile form (data URL)
    pub picture: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub ward_no: String,
    pub dob: String,
    pub city: String,

    /// Gates access to the report form and the citizen dashboard
    pub is_profile_complete: bool,
    pub setup_date: Option<String>,
}

impl CitizenProfile {
    /// Name written on reports: full name, then display name, then a placeholder
    pub fn reporter_name(&self) -> &str {
        [self.full_name.as_str(), self.name.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS_CITIZEN)
    }

    /// First word of the reporter name, for greetings
    pub fn first_name(&self) -> &str {
        self.reporter_name()
            .split_whitespace()
            .next()
            .unwrap_or(ANONYMOUS_CITIZEN)
    }

    /// Avatar to show: uploaded picture first, provider photo second
    pub fn avatar(&self) -> Option<&str> {
        [self.picture.as_str(), self.photo.as_str()]
            .into_iter()
            .find(|p| !p.is_empty())
    }

    /// Fields the profile form requires before the profile counts as complete
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("full name");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_name_fallbacks() {
        let mut profile = CitizenProfile::default();
        assert_eq!(profile.reporter_name(), ANONYMOUS_CITIZEN);

        profile.name = "Asha Rao".into();
        assert_eq!(profile.reporter_name(), "Asha Rao");

        profile.full_name = "Asha K. Rao".into();
        assert_eq!(profile.reporter_name(), "Asha K. Rao");
        assert_eq!(profile.first_name(), "Asha");
    }

    #[test]
    fn test_missing_fields() {
        let profile = CitizenProfile {
            full_name: "Asha".into(),
            ..Default::default()
        };
        assert_eq!(profile.missing_required_fields(), vec!["phone", "city"]);
    }

    #[test]
    fn test_loads_camel_case_session() {
        let json = r#"{"name":"Asha","email":"asha@example.com","wardNo":"10","isProfileComplete":true}"#;
        let profile: CitizenProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.ward_no, "10");
        assert!(profile.is_profile_complete);
    }
}
