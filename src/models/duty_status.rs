use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    OnDuty,
    OffDuty,
}

impl DutyStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DutyStatus::OnDuty => "ON_DUTY",
            DutyStatus::OffDuty => "OFF_DUTY",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ON_DUTY" => Some(DutyStatus::OnDuty),
            "OFF_DUTY" => Some(DutyStatus::OffDuty),
            _ => None,
        }
    }

    pub fn is_on_duty(&self) -> bool {
        matches!(self, DutyStatus::OnDuty)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DutyStatus::OnDuty => "on duty",
            DutyStatus::OffDuty => "off duty",
        }
    }
}
