use crate::domain::model::{Category, Person};

/// 所有人都可見的標記
pub const VISIBLE_TO_ALL: &str = "all";

/// 名單篩選條件：可見性與類別
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub viewer: Option<String>,
    pub is_admin: bool,
    pub category: Option<Category>,
}

impl RosterFilter {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn allows(&self, person: &Person) -> bool {
        is_visible(person, self.viewer.as_deref(), self.is_admin)
            && self.category.map_or(true, |c| person.category == c)
    }

    pub fn apply(&self, people: &[Person]) -> Vec<Person> {
        people.iter().filter(|p| self.allows(p)).cloned().collect()
    }
}

/// 管理員看得到所有人；其他人只看得到 `visible_to` 含自己或 `all` 的紀錄
pub fn is_visible(person: &Person, viewer: Option<&str>, is_admin: bool) -> bool {
    if is_admin {
        return true;
    }
    person
        .visible_to
        .iter()
        .any(|id| id == VISIBLE_TO_ALL || Some(id.as_str()) == viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Gender;

    fn person(name: &str, category: Category, visible_to: &[&str]) -> Person {
        Person {
            id: name.to_lowercase(),
            name: name.to_string(),
            birth_date: "1990-01-01".to_string(),
            birth_time: None,
            is_lunar: false,
            gender: Gender::Male,
            category,
            visible_to: visible_to.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_visibility_rules() {
        let people = vec![
            person("Public", Category::Friend, &["all"]),
            person("Private", Category::Family, &["u1"]),
            person("Hidden", Category::Family, &[]),
        ];

        let visitor = RosterFilter {
            viewer: Some("u2".to_string()),
            ..RosterFilter::default()
        };
        let names: Vec<_> = visitor.apply(&people).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Public"]);

        let owner = RosterFilter {
            viewer: Some("u1".to_string()),
            ..RosterFilter::default()
        };
        assert_eq!(owner.apply(&people).len(), 2);
        assert_eq!(RosterFilter::admin().apply(&people).len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let people = vec![
            person("A", Category::Friend, &["all"]),
            person("B", Category::Family, &["all"]),
        ];
        let filter = RosterFilter::admin().with_category(Some(Category::Family));
        let kept = filter.apply(&people);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "B");
    }
}
