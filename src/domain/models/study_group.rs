use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::short_id;

pub const GROUP_CAPACITY_MIN: u32 = 2;
pub const GROUP_CAPACITY_MAX: u32 = 10;
pub const GROUP_CAPACITY_DEFAULT: u32 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroup {
    pub id: String,
    pub name: String,
    pub course_code: String,
    pub members: u32,
    pub capacity: u32,
}

/// Validated form input for `/newgroup`, completed by a background worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupDraft {
    pub name: String,
    pub course_code: String,
    pub capacity: u32,
}

impl StudyGroup {
    pub fn from_draft(draft: GroupDraft) -> StudyGroup {
        return StudyGroup {
            id: format!("g-{}", short_id()),
            name: draft.name,
            course_code: draft.course_code.to_uppercase(),
            members: 1,
            capacity: draft.capacity.clamp(GROUP_CAPACITY_MIN, GROUP_CAPACITY_MAX),
        };
    }

    pub fn is_full(&self) -> bool {
        return self.members >= self.capacity;
    }

    pub fn seed() -> Vec<StudyGroup> {
        return vec![
            StudyGroup {
                id: "g1".to_string(),
                name: "CS101 Final Review".to_string(),
                course_code: "CS101".to_string(),
                members: 4,
                capacity: 5,
            },
            StudyGroup {
                id: "g2".to_string(),
                name: "Algebra Problem Solvers".to_string(),
                course_code: "MA203".to_string(),
                members: 2,
                capacity: 4,
            },
            StudyGroup {
                id: "g3".to_string(),
                name: "Quantum Minds".to_string(),
                course_code: "PHY301".to_string(),
                members: 5,
                capacity: 5,
            },
            StudyGroup {
                id: "g4".to_string(),
                name: "Modernism Discussion".to_string(),
                course_code: "LIT120".to_string(),
                members: 3,
                capacity: 6,
            },
        ];
    }
}
