#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

use crate::domain::models::Course;
use crate::domain::models::Student;
use crate::domain::models::StudyGroup;

#[derive(Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(String),
    Full(String),
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(String),
    AlreadyConnected(String),
    NotFound,
}

/// The portal's three mock collections. All mutation happens here so the
/// UI layer only ever applies events and renders.
pub struct Catalog {
    pub courses: Vec<Course>,
    pub groups: Vec<StudyGroup>,
    pub students: Vec<Student>,
}

impl Default for Catalog {
    fn default() -> Catalog {
        return Catalog {
            courses: Course::seed(),
            groups: StudyGroup::seed(),
            students: Student::seed(),
        };
    }
}

impl Catalog {
    pub fn new(courses: Vec<Course>, groups: Vec<StudyGroup>, students: Vec<Student>) -> Catalog {
        return Catalog {
            courses,
            groups,
            students,
        };
    }

    /// Newest entries first, mirroring the upload flow's display order.
    pub fn insert_course(&mut self, course: Course) {
        self.courses.insert(0, course);
    }

    pub fn insert_group(&mut self, group: StudyGroup) {
        self.groups.insert(0, group);
    }

    pub fn course_at(&self, index: usize) -> Option<&Course> {
        if index == 0 {
            return None;
        }
        return self.courses.get(index - 1);
    }

    pub fn group_at(&self, index: usize) -> Option<&StudyGroup> {
        if index == 0 {
            return None;
        }
        return self.groups.get(index - 1);
    }

    /// Capacity is checked at application time, not request time; a group
    /// can fill up while a join is simulating its network delay.
    pub fn join_group(&mut self, id: &str) -> JoinOutcome {
        let group = self.groups.iter_mut().find(|e| return e.id == id);
        if group.is_none() {
            return JoinOutcome::NotFound;
        }

        let group = group.unwrap();
        if group.is_full() {
            return JoinOutcome::Full(group.name.to_string());
        }

        group.members += 1;
        return JoinOutcome::Joined(group.name.to_string());
    }

    pub fn connect_partner(&mut self, id: &str) -> ConnectOutcome {
        let student = self.students.iter_mut().find(|e| return e.id == id);
        if student.is_none() {
            return ConnectOutcome::NotFound;
        }

        let student = student.unwrap();
        if student.connected {
            return ConnectOutcome::AlreadyConnected(student.name.to_string());
        }

        student.connected = true;
        return ConnectOutcome::Connected(student.name.to_string());
    }

    pub fn filter_students(&self, term: &str) -> Vec<&Student> {
        if term.trim().is_empty() {
            return self.students.iter().collect();
        }

        return self
            .students
            .iter()
            .filter(|e| return e.matches(term))
            .collect();
    }

    pub fn reset_courses(&mut self) {
        self.courses = Course::seed();
    }

    pub fn reset_groups(&mut self) {
        self.groups = StudyGroup::seed();
    }

    pub fn reset_students(&mut self) {
        self.students = Student::seed();
    }
}
