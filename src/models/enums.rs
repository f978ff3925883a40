use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Literals must match the snake_case form of the variant (serde uses it).
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            #[allow(dead_code)]
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ConsultationType {
    Initial => "initial",
    FollowUp => "follow_up",
    Telehealth => "telehealth",
    Emergency => "emergency",
    Procedure => "procedure",
});

impl ConsultationType {
    /// Heading used on exported documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initial => "Initial Consultation",
            Self::FollowUp => "Follow-up Consultation",
            Self::Telehealth => "Telehealth Consultation",
            Self::Emergency => "Emergency Consultation",
            Self::Procedure => "Procedure Note",
        }
    }
}

str_enum!(Gender {
    Female => "female",
    Male => "male",
    Other => "other",
    Unspecified => "unspecified",
});

str_enum!(SectionType {
    Symptoms => "symptoms",
    Vitals => "vitals",
    History => "history",
    Examination => "examination",
    Assessment => "assessment",
    Diagnosis => "diagnosis",
    Plan => "plan",
    Medication => "medication",
    FollowUp => "follow_up",
    Notes => "notes",
    MentalStatus => "mental_status",
    Goals => "goals",
});

str_enum!(TemplateCategory {
    GeneralPractice => "general_practice",
    Psychology => "psychology",
    Physiotherapy => "physiotherapy",
    Dietetics => "dietetics",
    Paediatrics => "paediatrics",
    Chronic => "chronic",
});

str_enum!(Jurisdiction {
    SouthAfrica => "south_africa",
    UnitedKingdom => "united_kingdom",
    UnitedStates => "united_states",
    International => "international",
});

str_enum!(TriggerType {
    AppointmentBooked => "appointment_booked",
    AppointmentReminder => "appointment_reminder",
    SessionCompleted => "session_completed",
    PrescriptionIssued => "prescription_issued",
    FollowUpDue => "follow_up_due",
    PatientBirthday => "patient_birthday",
});

str_enum!(EventStatus {
    Pending => "pending",
    Executing => "executing",
    Completed => "completed",
    Failed => "failed",
});

str_enum!(HealthStatus {
    Excellent => "excellent",
    Good => "good",
    Fair => "fair",
    Concerning => "concerning",
});

str_enum!(RiskLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(DocumentKind {
    Consultation => "consultation",
    SessionNotes => "session_notes",
    Prescription => "prescription",
});

impl DocumentKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Consultation => "Consultation Report",
            Self::SessionNotes => "Session Notes",
            Self::Prescription => "Prescription",
        }
    }
}
