use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub major: String,
    pub courses: Vec<String>,
    pub avatar_url: String,
    #[serde(default)]
    pub connected: bool,
}

impl Student {
    /// Case-insensitive match on name, major, or any enrolled course code.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        return self.name.to_lowercase().contains(&term)
            || self.major.to_lowercase().contains(&term)
            || self
                .courses
                .iter()
                .any(|course| return course.to_lowercase().contains(&term));
    }

    pub fn seed() -> Vec<Student> {
        let records: Vec<(&str, &str, &str, Vec<&str>)> = vec![
            ("s1", "Alice Johnson", "Computer Science", vec!["CS101", "MA203"]),
            ("s2", "Bob Williams", "Physics", vec!["PHY301", "MA203"]),
            ("s3", "Charlie Brown", "English Literature", vec!["LIT120"]),
            ("s4", "Diana Prince", "Quantum Engineering", vec!["PHY301", "CS101"]),
            ("s5", "Ethan Hunt", "Computer Science", vec!["CS101"]),
            ("s6", "Fiona Glenanne", "Chemistry", vec!["CHEM201", "PHY301"]),
        ];

        return records
            .into_iter()
            .map(|(id, name, major, courses)| {
                let seed_name = name.split(' ').next().unwrap().to_lowercase();
                return Student {
                    id: id.to_string(),
                    name: name.to_string(),
                    major: major.to_string(),
                    courses: courses
                        .into_iter()
                        .map(|e| return e.to_string())
                        .collect(),
                    avatar_url: format!("https://picsum.photos/seed/{seed_name}/100/100"),
                    connected: false,
                };
            })
            .collect();
    }
}
