//! Person display formatting
//!
//! Formats persons for terminal output as a table.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Person;

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "Initials")]
    initials: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created by")]
    created_by: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&Person> for PersonRow {
    fn from(person: &Person) -> Self {
        Self {
            initials: person.initials.to_string(),
            name: person.name().to_string(),
            created_by: person.created_by.clone(),
            created_at: person.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Format a list of persons as a table
pub fn format_person_list(persons: &[Person]) -> String {
    if persons.is_empty() {
        return "No persons found.".to_string();
    }

    let rows: Vec<PersonRow> = persons.iter().map(PersonRow::from).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Initials, PersonName};

    #[test]
    fn test_empty_list() {
        assert_eq!(format_person_list(&[]), "No persons found.");
    }

    #[test]
    fn test_person_table() {
        let person = Person::new(
            PersonName::new("Peter", Some("James"), "Pan").unwrap(),
            Initials::parse("pp").unwrap(),
            "jo",
        );

        let output = format_person_list(&[person]);
        assert!(output.contains("Initials"));
        assert!(output.contains("Peter James Pan"));
        assert!(output.contains("pp"));
        assert!(output.contains("jo"));
    }
}
