use grades_core::model::{CourseId, Snapshot};
use serde::{Deserialize, Serialize};

/// Outcome category of a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "sucesso")]
    Success,
    #[serde(rename = "erro")]
    Error,
}

/// Uniform response of every backend call.
///
/// On success `snapshot` holds the complete, ranked state. Error responses
/// may carry the current state as well; the UI ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "dados", default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_course: Option<CourseId>,
}

impl Envelope {
    #[must_use]
    pub fn success(message: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            snapshot: Some(snapshot),
            created_course: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>, snapshot: Option<Snapshot>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            snapshot,
            created_course: None,
        }
    }

    #[must_use]
    pub fn with_created_course(mut self, id: Option<CourseId>) -> Self {
        self.created_course = id;
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// The snapshot the UI should adopt: present only on success.
    #[must_use]
    pub fn authoritative_snapshot(&self) -> Option<&Snapshot> {
        if self.is_success() {
            self.snapshot.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let envelope = Envelope::success("ok", Snapshot::default());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "sucesso");
        assert_eq!(json["mensagem"], "ok");
        assert!(json["dados"]["courses"].as_array().unwrap().is_empty());
        assert!(json.get("created_course").is_none());
    }

    #[test]
    fn failure_snapshot_is_not_authoritative() {
        let envelope = Envelope::failure("nope", Some(Snapshot::default()));
        assert!(!envelope.is_success());
        assert!(envelope.authoritative_snapshot().is_none());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "erro");
    }
}
