use asetrack_entity::maintenance_report;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("report {id} has an inconsistent workflow state: {reason}")]
pub struct InvalidState {
    pub id: Uuid,
    pub reason: &'static str,
}

/// Where a report is in the workflow.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportState {
    /// Still editable, not part of a document
    Draft,
    Submitted {
        document_id: Uuid,
        by: Option<Uuid>,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    Approved {
        document_id: Uuid,
        submitted_by: Option<Uuid>,
        #[serde(with = "time::serde::rfc3339")]
        submitted_at: OffsetDateTime,
        by: Option<Uuid>,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
}

impl ReportState {
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn document_id(&self) -> Option<Uuid> {
        match self {
            Self::Draft => None,
            Self::Submitted { document_id, .. } | Self::Approved { document_id, .. } => {
                Some(*document_id)
            }
        }
    }
}

impl TryFrom<&maintenance_report::Model> for ReportState {
    type Error = InvalidState;

    fn try_from(report: &maintenance_report::Model) -> Result<Self, Self::Error> {
        let invalid = |reason| InvalidState {
            id: report.id,
            reason,
        };

        match (
            report.document_id,
            report.is_submitted,
            report.submitted_at,
            report.is_approved,
            report.approved_at,
        ) {
            (None, false, None, false, None) => Ok(Self::Draft),
            (None, ..) => Err(invalid("workflow fields set without a document")),
            (Some(_), false, ..) => Err(invalid("linked to a document but not submitted")),
            (Some(_), true, None, ..) => Err(invalid("submitted without a timestamp")),
            (Some(document_id), true, Some(at), false, None) => Ok(Self::Submitted {
                document_id,
                by: report.submitted_by,
                at,
            }),
            (Some(_), true, Some(_), false, Some(_)) => {
                Err(invalid("approval timestamp without being approved"))
            }
            (Some(_), true, Some(_), true, None) => Err(invalid("approved without a timestamp")),
            (Some(document_id), true, Some(submitted_at), true, Some(at)) => Ok(Self::Approved {
                document_id,
                submitted_by: report.submitted_by,
                submitted_at,
                by: report.approved_by,
                at,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use asetrack_entity::maintenance_report::Condition;
    use time::macros::{date, datetime};

    fn draft() -> maintenance_report::Model {
        let now = datetime!(2025-03-01 08:00 UTC);
        maintenance_report::Model {
            id: Uuid::new_v4(),
            document_id: None,
            asset_id: Uuid::new_v4(),
            checker_id: None,
            antivirus_updated: true,
            clear_temporary: false,
            overall_condition: Condition::Normal,
            inspection_date: date!(2025 - 03 - 01),
            remarks: String::new(),
            period: "S1-2025".into(),
            user_name: "Budi".into(),
            user_position: "Staff".into(),
            user_branch: "Jakarta".into(),
            user_department: "IT".into(),
            user_sub_department: "Infra".into(),
            is_submitted: false,
            is_approved: false,
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn states() {
        let document = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let submitted_at = datetime!(2025-03-02 09:00 UTC);
        let approved_at = datetime!(2025-03-03 10:00 UTC);

        let report = draft();
        assert_eq!(ReportState::try_from(&report), Ok(ReportState::Draft));

        let report = maintenance_report::Model {
            document_id: Some(document),
            is_submitted: true,
            submitted_by: Some(admin),
            submitted_at: Some(submitted_at),
            ..draft()
        };
        assert_eq!(
            ReportState::try_from(&report),
            Ok(ReportState::Submitted {
                document_id: document,
                by: Some(admin),
                at: submitted_at
            })
        );

        let report = maintenance_report::Model {
            is_approved: true,
            approved_by: None,
            approved_at: Some(approved_at),
            ..report
        };
        let state = ReportState::try_from(&report);
        assert_eq!(
            state,
            Ok(ReportState::Approved {
                document_id: document,
                submitted_by: Some(admin),
                submitted_at,
                by: None,
                at: approved_at,
            })
        );
        assert_eq!(state.map(|s| s.document_id()), Ok(Some(document)));
    }

    #[test]
    fn rejects_illegal_combinations() {
        let document = Some(Uuid::new_v4());
        let at = Some(datetime!(2025-03-02 09:00 UTC));

        let cases = [
            // approved without a document
            maintenance_report::Model {
                is_submitted: true,
                is_approved: true,
                submitted_at: at,
                approved_at: at,
                ..draft()
            },
            // linked, but not submitted
            maintenance_report::Model {
                document_id: document,
                ..draft()
            },
            // submitted without a timestamp
            maintenance_report::Model {
                document_id: document,
                is_submitted: true,
                ..draft()
            },
            // approved but never submitted
            maintenance_report::Model {
                document_id: document,
                is_approved: true,
                approved_at: at,
                ..draft()
            },
            // approved without a timestamp
            maintenance_report::Model {
                document_id: document,
                is_submitted: true,
                submitted_at: at,
                is_approved: true,
                ..draft()
            },
        ];

        for report in &cases {
            let result = ReportState::try_from(report);
            assert!(
                matches!(result, Err(InvalidState { id, .. }) if id == report.id),
                "{report:?} must be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn serialize() -> anyhow::Result<()> {
        let json = serde_json::to_value(ReportState::Draft)?;
        assert_eq!(json, serde_json::json!({"state": "draft"}));

        let state = ReportState::Submitted {
            document_id: Uuid::nil(),
            by: None,
            at: datetime!(2025-03-02 09:00 UTC),
        };
        let json = serde_json::to_value(&state)?;
        assert_eq!(json["state"], "submitted");
        assert_eq!(json["document_id"], Uuid::nil().to_string());
        assert_eq!(json["at"], "2025-03-02T09:00:00Z");

        Ok(())
    }
}
