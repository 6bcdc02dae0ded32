#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Courses,
    Groups,
    Partners,
    Assistant,
}

impl View {
    pub fn next(self) -> View {
        match self {
            View::Courses => return View::Groups,
            View::Groups => return View::Partners,
            View::Partners => return View::Assistant,
            View::Assistant => return View::Courses,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Courses => return "Courses",
            View::Groups => return "Study Groups",
            View::Partners => return "Find Partners",
            View::Assistant => return "AI Assistant",
        }
    }
}
