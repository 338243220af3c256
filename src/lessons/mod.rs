//! Read-only catalog of SQL lessons, grouped by topic.

mod catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

impl Lesson {
    /// Case-insensitive substring match on the title. A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.title.to_lowercase().contains(&q)
    }

    /// The example as it goes into the editor: trimmed, ending in `;`.
    pub fn editor_text(&self) -> String {
        let example = self.example.trim();
        if example.ends_with(';') {
            example.to_string()
        } else {
            format!("{};", example)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LessonGroup {
    pub title: &'static str,
    pub lessons: &'static [Lesson],
}

/// A group with only the lessons that passed a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub title: &'static str,
    pub lessons: Vec<&'static Lesson>,
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    groups: &'static [LessonGroup],
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            groups: catalog::GROUPS,
        }
    }

    pub fn groups(&self) -> &'static [LessonGroup] {
        self.groups
    }

    pub fn lessons(&self) -> impl Iterator<Item = &'static Lesson> {
        self.groups.iter().flat_map(|g| g.lessons.iter())
    }

    pub fn len(&self) -> usize {
        self.lessons().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_lesson(&self, id: &str) -> Option<&'static Lesson> {
        self.lessons().find(|lesson| lesson.id == id)
    }

    /// Groups in catalog order, keeping only matching lessons. Groups left
    /// without lessons are dropped.
    pub fn filter(&self, query: &str) -> Vec<GroupView> {
        self.groups
            .iter()
            .filter_map(|group| {
                let lessons: Vec<&'static Lesson> =
                    group.lessons.iter().filter(|l| l.matches(query)).collect();
                if lessons.is_empty() {
                    None
                } else {
                    Some(GroupView {
                        title: group.title,
                        lessons,
                    })
                }
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
