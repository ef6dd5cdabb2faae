use regex::Regex;

use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
    Category,
}

impl MatchField {
    pub fn label(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Category => "category",
        }
    }
}

/// A search hit: the task plus the field the pattern matched in
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub task: &'a Task,
    pub field: MatchField,
}

/// Search tasks by regex. One hit per matching field, in task order,
/// unlike the substring search the list view applies (`ops::query`).
pub fn search_tasks<'a>(tasks: &'a [Task], re: &Regex) -> Vec<SearchHit<'a>> {
    let mut hits = Vec::new();
    for task in tasks {
        if re.is_match(&task.title) {
            hits.push(SearchHit {
                task,
                field: MatchField::Title,
            });
        }
        if !task.description.is_empty() && re.is_match(&task.description) {
            hits.push(SearchHit {
                task,
                field: MatchField::Description,
            });
        }
        if re.is_match(&task.category) {
            hits.push(SearchHit {
                task,
                field: MatchField::Category,
            });
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::model::task::Priority;

    fn task(title: &str, description: &str, category: &str) -> Task {
        Task {
            id: format!("t-{title}"),
            title: title.to_string(),
            description: description.to_string(),
            priority: Priority::Medium,
            category: category.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_date: None,
        }
    }

    #[test]
    fn reports_the_field_that_matched() {
        let tasks = vec![
            task("Fix the boiler", "", "Home"),
            task("Call plumber", "about the boiler", "Home"),
        ];
        let re = Regex::new("boiler").unwrap();

        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].field, MatchField::Title);
        assert_eq!(hits[1].field, MatchField::Description);
    }

    #[test]
    fn one_task_can_hit_on_several_fields() {
        let tasks = vec![task("Shopping list", "weekly shopping", "Shopping")];
        let re = Regex::new("(?i)shopping").unwrap();

        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn regex_syntax_is_honored() {
        let tasks = vec![task("Pay invoice #42", "", "Finance"), task("Pay rent", "", "Finance")];
        let re = Regex::new(r"#\d+").unwrap();

        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task.title, "Pay invoice #42");
    }

    #[test]
    fn empty_description_is_skipped() {
        // ".*" would match an empty description; the empty field is not searched
        let tasks = vec![task("a", "", "b")];
        let re = Regex::new(".*").unwrap();
        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 2);
    }
}
