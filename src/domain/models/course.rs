use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub file_name: String,
}

/// Validated form input for `/upload`, completed by a background worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseDraft {
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub file_name: String,
}

impl Course {
    pub fn from_draft(draft: CourseDraft) -> Course {
        return Course {
            id: format!("c-{}", short_id()),
            code: draft.code.to_uppercase(),
            name: draft.name,
            instructor: draft.instructor,
            file_name: draft.file_name,
        };
    }

    pub fn seed() -> Vec<Course> {
        return vec![
            Course {
                id: "c1".to_string(),
                code: "CS101".to_string(),
                name: "Intro to Computer Science".to_string(),
                instructor: "Dr. Alan Turing".to_string(),
                file_name: "cs101-materials.pdf".to_string(),
            },
            Course {
                id: "c2".to_string(),
                code: "MA203".to_string(),
                name: "Linear Algebra".to_string(),
                instructor: "Dr. Ada Lovelace".to_string(),
                file_name: "ma203-materials.pdf".to_string(),
            },
            Course {
                id: "c3".to_string(),
                code: "PHY301".to_string(),
                name: "Quantum Mechanics".to_string(),
                instructor: "Dr. Marie Curie".to_string(),
                file_name: "phy301-materials.pdf".to_string(),
            },
            Course {
                id: "c4".to_string(),
                code: "LIT120".to_string(),
                name: "Modernist Literature".to_string(),
                instructor: "Dr. Virginia Woolf".to_string(),
                file_name: "lit120-materials.pdf".to_string(),
            },
        ];
    }
}

pub fn short_id() -> String {
    return Uuid::new_v4()
        .to_string()
        .split('-')
        .next()
        .unwrap()
        .to_string();
}
